use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "FMDCRYPT_PASSWORD";

/// Reads the unlock password.
///
/// Sources, in order: the `FMDCRYPT_PASSWORD` environment variable, the first
/// line of piped stdin (only when `stdin_free` is set, i.e. stdin is not
/// carrying the input data), and an interactive prompt.
pub fn read_password(stdin_free: bool) -> Result<Zeroizing<String>> {
    //  FMDCRYPT_PASSWORD="hunter2" fmdcrypt unlock
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  printf "%s" "$PW" | fmdcrypt unlock
    if stdin_free && !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No password provided")
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
