//! passlock - password-protect local files.
//!
//! Encrypts files under a password-derived key, maintains a password file
//! for cheap verification, and re-encrypts protected files when the
//! password changes.

use clap::{Parser, Subcommand};
use passlock::{
    change_password, crypto, verify_password, write_password_file, PasswordVerdict, Result,
};
use std::io::{self, Write};
use std::path::PathBuf;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "passlock")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Password-based protection for local files",
    long_about = "Encrypts files under a password-derived key (PBKDF2 + AES-256-GCM), \
                  verifies passwords against an encrypted sentinel file, and re-encrypts \
                  protected files under a new password."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file under a password
    Encrypt {
        /// Input file (plaintext)
        input: PathBuf,

        /// Output file (ciphertext)
        output: PathBuf,
    },

    /// Decrypt a file
    Decrypt {
        /// Input file (ciphertext)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Set or clear the password file
    SetPassword {
        /// Path of the password file
        password_file: PathBuf,
    },

    /// Check a password against the password file
    Check {
        /// Path of the password file
        password_file: PathBuf,
    },

    /// Change the password on protected files and the password file
    Passwd {
        /// Path of the password file
        password_file: PathBuf,

        /// Protected files to re-encrypt under the new password
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt { input, output } => cmd_encrypt(&input, &output),
        Commands::Decrypt { input, output } => cmd_decrypt(&input, output),
        Commands::SetPassword { password_file } => cmd_set_password(&password_file),
        Commands::Check { password_file } => cmd_check(&password_file),
        Commands::Passwd {
            password_file,
            files,
        } => cmd_passwd(&password_file, &files),
    }
}

fn prompt_password(prompt: &str) -> Zeroizing<String> {
    Zeroizing::new(rpassword::prompt_password(prompt).unwrap_or_else(|_| {
        eprint!("{}", prompt);
        io::stderr().flush().unwrap();
        let mut password = String::new();
        io::stdin().read_line(&mut password).unwrap();
        password.trim().to_string()
    }))
}

fn prompt_new_password(prompt: &str) -> Zeroizing<String> {
    let password = prompt_password(prompt);
    let confirm = prompt_password("Confirm password: ");

    if *password != *confirm {
        eprintln!("Passwords do not match");
        std::process::exit(1);
    }
    password
}

fn cmd_encrypt(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let password = prompt_new_password("Password: ");

    let plaintext = Zeroizing::new(std::fs::read(input)?);
    crypto::encrypt_file(output, &password, &plaintext)?;
    println!("Encrypted {} bytes to {}", plaintext.len(), output.display());

    Ok(())
}

fn cmd_decrypt(input: &PathBuf, output: Option<PathBuf>) -> Result<()> {
    let password = prompt_password("Password: ");

    let plaintext = crypto::decrypt_file(input, &password)?;

    match output {
        Some(path) => {
            std::fs::write(&path, plaintext.as_slice())?;
            println!("Wrote {} bytes to {}", plaintext.len(), path.display());
        }
        None => {
            io::stdout().write_all(&plaintext)?;
        }
    }

    Ok(())
}

fn cmd_set_password(password_file: &PathBuf) -> Result<()> {
    let password = prompt_password("New password (empty to clear): ");

    if password.is_empty() {
        write_password_file(&password, password_file)?;
        println!("Password cleared");
        return Ok(());
    }

    let confirm = prompt_password("Confirm password: ");
    if *password != *confirm {
        eprintln!("Passwords do not match");
        std::process::exit(1);
    }

    write_password_file(&password, password_file)?;
    println!("Password file written to {}", password_file.display());

    Ok(())
}

fn cmd_check(password_file: &PathBuf) -> Result<()> {
    let password = prompt_password("Password: ");

    match verify_password(&password, password_file)? {
        PasswordVerdict::NoPasswordSet => println!("No password has been set"),
        PasswordVerdict::Correct => println!("Password correct"),
        PasswordVerdict::Incorrect => {
            eprintln!("Password incorrect");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn cmd_passwd(password_file: &PathBuf, files: &[PathBuf]) -> Result<()> {
    let old_password = prompt_password("Current password: ");

    // Rekeying with a wrong old password must never get this far; the
    // password file is the authority on correctness.
    if verify_password(&old_password, password_file)? == PasswordVerdict::Incorrect {
        eprintln!("Current password incorrect");
        std::process::exit(1);
    }

    let new_password = prompt_new_password("New password: ");

    for file in files {
        change_password(file, &old_password, &new_password)?;
        println!("Re-encrypted {}", file.display());
    }

    write_password_file(&new_password, password_file)?;
    println!("Password changed successfully");

    Ok(())
}
