//! QuickApp file command handlers.

use std::io::Read;

use tabled::Tabled;

use quickhub_api::models::{FileEntry, QuickAppFile};
use quickhub_api::HubClient;

use crate::cli::{FilesArgs, FilesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, serde::Serialize)]
struct FileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Main")]
    main: String,
}

impl From<&FileEntry> for FileRow {
    fn from(entry: &FileEntry) -> Self {
        Self {
            name: entry.name().to_owned(),
            main: if entry.is_main() { "yes".into() } else { String::new() },
        }
    }
}

// ── Dispatch ────────────────────────────────────────────────────────

pub async fn handle(
    args: FilesArgs,
    client: &HubClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = args.id;
    match args.command {
        FilesCommand::List => {
            let files = client
                .list_files(id)
                .await
                .map_err(|e| CliError::from_api_for(id, e))?;
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            let rendered = match global.output {
                crate::cli::OutputFormat::Table => output::render_table(&rows),
                crate::cli::OutputFormat::Json => output::render_json(&rows),
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        FilesCommand::Cat { name } => {
            let file = client
                .get_file(id, &name)
                .await
                .map_err(|e| CliError::from_api_for(id, e))?;
            output::print_output(&file.content, global.quiet);
            Ok(())
        }

        FilesCommand::Push { name, from } => {
            let content = read_content(from.as_deref())?;
            // Fetch first so main-flag and type metadata survive the save.
            let mut file = client
                .get_file(id, &name)
                .await
                .map_err(|e| CliError::from_api_for(id, e))?;
            file.content = content;
            client.save_file(id, &file).await?;
            output::print_output(&format!("saved {name}"), global.quiet);
            Ok(())
        }

        FilesCommand::New { name } => {
            client.create_file(id, &QuickAppFile::lua(&name, "")).await?;
            output::print_output(&format!("created {name}"), global.quiet);
            Ok(())
        }

        FilesCommand::Mv { from, to } => {
            client.rename_file(id, &from, &to).await?;
            output::print_output(&format!("renamed {from} -> {to}"), global.quiet);
            Ok(())
        }

        FilesCommand::Rm { name, yes } => {
            if !yes && !confirm(&format!("delete '{name}'?"))? {
                return Ok(());
            }
            client.delete_file(id, &name).await?;
            output::print_output(&format!("deleted {name}"), global.quiet);
            Ok(())
        }
    }
}

/// Read new file content from a local path, or stdin when none is given.
fn read_content(path: Option<&std::path::Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn confirm(prompt: &str) -> Result<bool, CliError> {
    use std::io::Write;

    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
