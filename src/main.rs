use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tabled::{Table, Tabled};

use simplerag_admin::client::ApiClient;
use simplerag_admin::config::Config;
use simplerag_admin::filter::{self, RoleFilter};
use simplerag_admin::format::{capitalize_first, format_date, format_relative_time, truncate_text};
use simplerag_admin::stats::{message_stats, session_stats};

#[derive(Parser)]
#[command(name = "simplerag-admin", version)]
#[command(about = "Terminal admin dashboard for the SimpleRAG backend")]
struct Cli {
    /// Backend API base URL (overrides ADMIN_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collection counts for the dashboard landing page
    Stats,
    /// List a collection as a table
    List {
        resource: Resource,
        /// Case-insensitive search over the fields shown in the table
        #[arg(long, default_value = "")]
        search: String,
        /// Narrow chat messages by role (ignored for other resources)
        #[arg(long, value_enum, default_value = "all")]
        role: RoleArg,
    },
    /// Fetch a single record by id and print it as JSON
    Show { resource: Resource, id: i64 },
    /// Delete a record by id
    Delete {
        resource: Resource,
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Upload a document for ingestion
    Upload { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Resource {
    Users,
    Files,
    ChatSessions,
    ChatMessages,
}

impl Resource {
    fn path(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Files => "files",
            Resource::ChatSessions => "chat-sessions",
            Resource::ChatMessages => "chat-messages",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Resource::Users => "user",
            Resource::Files => "file",
            Resource::ChatSessions => "chat session",
            Resource::ChatMessages => "chat message",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    All,
    User,
    Assistant,
}

impl From<RoleArg> for RoleFilter {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::All => RoleFilter::All,
            RoleArg::User => RoleFilter::User,
            RoleArg::Assistant => RoleFilter::Assistant,
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
}

#[derive(Tabled)]
struct FileRow {
    id: i64,
    name: String,
    uploaded: String,
}

#[derive(Tabled)]
struct SessionRow {
    id: i64,
    user: i64,
    messages: usize,
    started: String,
}

#[derive(Tabled)]
struct MessageRow {
    id: i64,
    session: i64,
    role: String,
    content: String,
    tokens: i64,
    created: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simplerag_admin=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = &cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    let client = ApiClient::new(&config);

    if let Err(e) = run(cli.command, &client).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Stats => {
            let stats = client.stats().await;
            println!("Users:         {}", stats.total_users);
            println!("Files:         {}", stats.total_files);
            println!("Chat sessions: {}", stats.total_chat_sessions);
            println!("Chat messages: {}", stats.total_chat_messages);
        }
        Command::List {
            resource,
            search,
            role,
        } => list(client, resource, &search, role.into()).await?,
        Command::Show { resource, id } => {
            let record: serde_json::Value = client.get_by_id(resource.path(), id).await?;
            println!("{record:#}");
        }
        Command::Delete { resource, id, yes } => {
            let prompt = format!("Are you sure you want to delete {} {id}?", resource.noun());
            if !yes && !confirm(&prompt)? {
                println!("aborted");
                return Ok(());
            }
            client.delete(resource.path(), id).await?;
            println!("{} {id} deleted", capitalize_first(resource.noun()));
        }
        Command::Upload { path } => {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or("upload path has no file name")?
                .to_string();
            let bytes = tokio::fs::read(&path).await?;
            let resp = client.upload_file(&file_name, bytes).await?;
            println!("uploaded {file_name}: {}", resp.status);
        }
    }

    Ok(())
}

async fn list(
    client: &ApiClient,
    resource: Resource,
    search: &str,
    role: RoleFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    match resource {
        Resource::Users => {
            let users = client.users().await?;
            let rows: Vec<UserRow> = filter::search(&users, search)
                .into_iter()
                .map(|u| UserRow {
                    id: u.id,
                    username: u.username.clone(),
                    email: u.email.clone(),
                })
                .collect();
            print_table(rows, users.len());
        }
        Resource::Files => {
            let files = client.files().await?;
            let rows: Vec<FileRow> = filter::search(&files, search)
                .into_iter()
                .map(|f| FileRow {
                    id: f.id,
                    name: f.name.clone(),
                    uploaded: format_date(f.uploaded_at),
                })
                .collect();
            print_table(rows, files.len());
        }
        Resource::ChatSessions => {
            let sessions = client.chat_sessions().await?;
            let rows: Vec<SessionRow> = filter::search(&sessions, search)
                .into_iter()
                .map(|s| SessionRow {
                    id: s.id,
                    user: s.user,
                    messages: s.messages.len(),
                    started: format_relative_time(s.created_at),
                })
                .collect();
            print_table(rows, sessions.len());

            let stats = session_stats(&sessions);
            println!(
                "{} sessions, {} messages, {} unique users",
                stats.total, stats.total_messages, stats.unique_users
            );
        }
        Resource::ChatMessages => {
            let messages = client.chat_messages().await?;
            let rows: Vec<MessageRow> = filter::filter_messages(&messages, search, role)
                .into_iter()
                .map(|m| MessageRow {
                    id: m.id,
                    session: m.session,
                    role: capitalize_first(&m.role.to_string()),
                    content: truncate_text(&m.content, 60),
                    tokens: m.total_tokens(),
                    created: format_date(m.created_at),
                })
                .collect();
            print_table(rows, messages.len());

            let stats = message_stats(&messages);
            println!(
                "{} messages ({} user / {} assistant), {} tokens",
                stats.total, stats.user_messages, stats.assistant_messages, stats.total_tokens
            );
        }
    }

    Ok(())
}

fn print_table<R: Tabled>(rows: Vec<R>, fetched: usize) {
    let shown = rows.len();
    if shown == 0 {
        println!("no matching records ({fetched} fetched)");
        return;
    }
    println!("{}", Table::new(rows));
    if shown != fetched {
        println!("showing {shown} of {fetched}");
    }
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
