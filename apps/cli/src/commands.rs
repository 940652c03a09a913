//! Command handlers.

use anyhow::{bail, Context as _};
use chrono::Local;
use colored::Colorize;

use watchlog_core::{build_view_now, EntryDraft, EntryId, ViewState};

use crate::args::{AddArgs, EditArgs, ViewArgs};
use crate::browse;
use crate::client::{ApiClient, ClientError};
use crate::credentials::{CredentialStore, Credentials};
use crate::render;

/// Everything a handler needs to reach the server.
pub struct Context {
    pub server: String,
    pub token: Option<String>,
    pub store: CredentialStore,
}

impl Context {
    /// Password from `--token`/`WATCHLOG_TOKEN`, else the one stored for
    /// this server.
    pub fn resolve_token(&self) -> anyhow::Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        match self.store.load()? {
            Some(creds) if same_server(&creds.server, &self.server) => Ok(creds.token),
            Some(creds) => bail!(
                "Logged in to {} but talking to {}; run `watchlog login` again",
                creds.server,
                self.server
            ),
            None => bail!("Not logged in; run `watchlog login` first"),
        }
    }

    pub fn client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.server, self.resolve_token()?))
    }
}

fn same_server(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

fn view_state(view: &ViewArgs) -> anyhow::Result<ViewState> {
    view.to_view_state().context("Invalid view option")
}

pub async fn handle_login(ctx: &Context, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let client = ApiClient::new(&ctx.server, password.clone());
    if !client.health().await? {
        bail!("Server at {} is not healthy", ctx.server);
    }

    // Any protected route will do; a rejection means the password is wrong
    client.list().await?;

    ctx.store.save(&Credentials {
        server: client.base_url().to_string(),
        token: password,
    })?;
    tracing::info!(path = %ctx.store.path().display(), "stored credentials");

    println!("{} {}", "Logged in to".green(), ctx.server);
    Ok(())
}

/// Reads without echo on a terminal; piped input is taken as one line.
fn prompt_password() -> anyhow::Result<String> {
    use std::io::IsTerminal;

    let term = console::Term::stderr();
    if !std::io::stdin().is_terminal() || !term.is_term() {
        return Ok(read_password_line(std::io::stdin().lock())?);
    }

    term.write_str("Password: ")?;
    Ok(term.read_secure_line()?)
}

fn read_password_line(mut input: impl std::io::BufRead) -> std::io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn handle_logout(ctx: &Context) -> anyhow::Result<()> {
    if ctx.store.clear()? {
        println!("{}", "Logged out".green());
    } else {
        println!("{}", "Not logged in".dimmed());
    }
    Ok(())
}

pub async fn handle_list(ctx: &Context, view: &ViewArgs) -> anyhow::Result<()> {
    let state = view_state(view)?;
    let entries = ctx.client()?.list().await?;
    render::print_view(&build_view_now(&entries, &state));
    Ok(())
}

pub async fn handle_search(ctx: &Context, term: &str, view: &ViewArgs) -> anyhow::Result<()> {
    let state = view_state(view)?;
    let entries = ctx.client()?.fetch(Some(term)).await?;
    render::print_view(&build_view_now(&entries, &state));
    Ok(())
}

pub async fn handle_show(ctx: &Context, id: EntryId) -> anyhow::Result<()> {
    let entry = ctx.client()?.get(id).await?;
    render::print_detail(&entry);
    Ok(())
}

pub async fn handle_add(ctx: &Context, args: AddArgs) -> anyhow::Result<()> {
    let draft = args.into_draft(Local::now().date_naive());
    draft.validate()?;

    let client = ctx.client()?;
    let id = client.create(&draft).await?;
    tracing::debug!(id, "created entry");

    // Show what was stored, after the server reconciled status and episode
    let saved = client.get(id).await?;
    println!("{} {}", "Logged".green(), render::entry_line(&saved));
    Ok(())
}

pub async fn handle_edit(ctx: &Context, id: EntryId, changes: EditArgs) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let current = client.get(id).await?;

    let mut draft = EntryDraft::from(&current);
    changes.apply(&mut draft);
    draft.validate()?;

    client.update(id, &draft).await?;

    let saved = client.get(id).await?;
    println!("{} {}", "Updated".green(), render::entry_line(&saved));
    Ok(())
}

pub async fn handle_delete(ctx: &Context, id: EntryId) -> anyhow::Result<()> {
    match ctx.client()?.delete(id).await {
        Ok(()) => {
            println!("{} #{}", "Deleted".green(), id);
            Ok(())
        }
        Err(ClientError::NotFound(_)) => bail!("No entry #{}", id),
        Err(e) => Err(e.into()),
    }
}

pub async fn handle_browse(ctx: &Context, view: &ViewArgs) -> anyhow::Result<()> {
    let state = view_state(view)?;
    browse::run(&ctx.client()?, state, None).await
}
