//! Signup and login commands - local credentials

use anyhow::{bail, Result};
use dialoguer::{Input, Password};
use subscribe_core::{OperationResult, SignupForm};

use super::get_context;
use crate::output;

fn prompt_text(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?)
}

pub fn run_signup(
    id: Option<String>,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let id = prompt_text(id, "ID")?;
    let email = prompt_text(email, "Email")?;
    let (password, confirm_password) = match password {
        Some(p) => (p.clone(), p),
        None => (prompt_password("Password")?, prompt_password("Confirm password")?),
    };

    let form = SignupForm {
        id,
        email,
        password,
        confirm_password,
    };
    let login = ctx.auth_service.signup(&form)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&login))?);
    } else {
        output::success(&format!("Account '{}' created. Log in with 'sub login'.", login.id));
    }
    Ok(())
}

pub fn run_login(id: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let id = prompt_text(id, "ID")?;
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };

    let authenticated = ctx.auth_service.authenticate(&id, &password)?;

    if json {
        let result = if authenticated {
            OperationResult::ok(id)
        } else {
            OperationResult::fail("Invalid ID or password")
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !authenticated {
        bail!("Invalid ID or password");
    }
    output::success(&format!("Welcome back, {}", id));
    Ok(())
}
