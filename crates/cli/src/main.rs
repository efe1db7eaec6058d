//! Command line client for Cabinet.

mod api_client;

use anyhow::{Context, Result};
use api_client::{ApiClient, UploadRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Parser, Subcommand};
use figment::Figment;
use figment::providers::{Format, Toml};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cabinetctl")]
#[command(about = "Command line client for Cabinet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ClientConfigArgs {
    /// Client config file path
    #[arg(long, env = "CABINET_CLIENT_CONFIG")]
    client_config: Option<String>,
}

#[derive(Args, Clone)]
struct ApiArgs {
    /// Server API URL (overrides the saved session)
    #[arg(long, env = "CABINET_SERVER")]
    server: Option<String>,

    /// Session token (overrides the saved session)
    #[arg(long, env = "CABINET_TOKEN")]
    token: Option<String>,

    #[command(flatten)]
    client: ClientConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server and store health
    Status {
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Show account and file counts
    Stats {
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Register a new account
    Register {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password value (avoid if possible; prefer --password-stdin)
        #[arg(long)]
        password: Option<String>,
        /// Read password from stdin
        #[arg(long, default_value_t = false)]
        password_stdin: bool,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Log in and save the session locally
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password value (avoid if possible; prefer --password-stdin)
        #[arg(long)]
        password: Option<String>,
        /// Read password from stdin
        #[arg(long, default_value_t = false)]
        password_stdin: bool,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Close the session and clear it locally
    Logout {
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Show the logged-in account
    Whoami {
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Create a folder
    Mkdir {
        /// Folder name
        name: String,
        /// Parent folder id (0 is the root)
        #[arg(long, default_value_t = 0)]
        parent: i64,
        /// Make the folder public
        #[arg(long, default_value_t = false)]
        public: bool,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Upload local files
    Upload {
        /// Files to upload
        #[arg(value_name = "PATH", num_args = 1..)]
        paths: Vec<PathBuf>,
        /// Parent folder id (0 is the root)
        #[arg(long, default_value_t = 0)]
        parent: i64,
        /// Make the uploads public
        #[arg(long, default_value_t = false)]
        public: bool,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// List files under a folder
    List {
        /// Parent folder id (0 is the root)
        #[arg(long, default_value_t = 0)]
        parent: i64,
        /// Page number (pages hold 20 records)
        #[arg(long, default_value_t = 0)]
        page: i64,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Show one file record
    Show {
        /// File id
        id: i64,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Write a file's content to stdout
    Cat {
        /// File id
        id: i64,
        #[command(flatten)]
        api: ApiArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Status { api } => handle_status(&api).await,
        Commands::Stats { api } => handle_stats(&api).await,
        Commands::Register {
            email,
            password,
            password_stdin,
            api,
        } => handle_register(&email, password, password_stdin, &api).await,
        Commands::Login {
            email,
            password,
            password_stdin,
            api,
        } => handle_login(&email, password, password_stdin, &api).await,
        Commands::Logout { api } => handle_logout(&api).await,
        Commands::Whoami { api } => handle_whoami(&api).await,
        Commands::Mkdir {
            name,
            parent,
            public,
            api,
        } => handle_mkdir(name, parent, public, &api).await,
        Commands::Upload {
            paths,
            parent,
            public,
            api,
        } => handle_upload(&paths, parent, public, &api).await,
        Commands::List { parent, page, api } => handle_list(parent, page, &api).await,
        Commands::Show { id, api } => handle_show(id, &api).await,
        Commands::Cat { id, api } => handle_cat(id, &api).await,
    }
}

async fn handle_status(api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;
    let (healthy, status) = client.status().await?;

    println!("db: {}", if status.db { "ok" } else { "unavailable" });
    println!(
        "sessions: {}",
        if status.sessions { "ok" } else { "unavailable" }
    );
    println!(
        "storage: {}",
        if status.storage { "ok" } else { "unavailable" }
    );

    if !healthy {
        anyhow::bail!("server reports degraded stores");
    }
    Ok(())
}

async fn handle_stats(api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;
    let stats = client.stats().await?;

    println!("Users: {}", stats.users);
    println!("Files: {}", stats.files);
    Ok(())
}

async fn handle_register(
    email: &str,
    password: Option<String>,
    password_stdin: bool,
    api: &ApiArgs,
) -> Result<()> {
    let password = read_password(password, password_stdin)?;
    let client = get_api_client(api).await?;

    let user = client.register(email, &password).await?;
    println!("Registered {} (id {})", user.email, user.id);
    println!("Log in with: cabinetctl login --email {}", user.email);
    Ok(())
}

async fn handle_login(
    email: &str,
    password: Option<String>,
    password_stdin: bool,
    api: &ApiArgs,
) -> Result<()> {
    let password = read_password(password, password_stdin)?;
    let config_path = client_config_path(api.client.client_config.as_deref())?;
    let mut config = load_client_config(&config_path).await?;

    let server = api
        .server
        .clone()
        .or(config.server.clone())
        .ok_or_else(|| anyhow::anyhow!("no server known: pass --server or set CABINET_SERVER"))?;
    let base_url = normalize_base_url(&server)?;

    let client = ApiClient::new(&base_url, None)?;
    let session = client.connect(email, &password).await?;

    config.server = Some(base_url);
    config.email = Some(email.to_string());
    config.token = Some(session.token);
    save_client_config(&config_path, &config).await?;

    println!("Logged in as {email}");
    println!("Session saved to {}", config_path.display());
    Ok(())
}

async fn handle_logout(api: &ApiArgs) -> Result<()> {
    let config_path = client_config_path(api.client.client_config.as_deref())?;
    let client = get_api_client(api).await?;

    // Clear the local session even when the server-side revoke fails; a
    // dead server must not pin a stale token on disk.
    if let Err(error) = client.disconnect().await {
        eprintln!("Warning: server-side logout failed: {error}");
    }

    let mut config = load_client_config(&config_path).await?;
    config.token = None;
    save_client_config(&config_path, &config).await?;

    println!("Session cleared");
    Ok(())
}

async fn handle_whoami(api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;
    let user = client.whoami().await?;

    println!("Email: {}", user.email);
    println!("User ID: {}", user.id);
    Ok(())
}

async fn handle_mkdir(name: String, parent: i64, public: bool, api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;

    let record = client
        .upload(&UploadRequest {
            name,
            kind: "folder".to_string(),
            data: None,
            parent_id: parent,
            is_public: public,
        })
        .await?;

    println!("Created folder '{}' (id {})", record.name, record.id);
    Ok(())
}

async fn handle_upload(paths: &[PathBuf], parent: i64, public: bool, api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;

    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("no usable file name: {}", path.display()))?;

        let record = client
            .upload(&UploadRequest {
                name: name.to_string(),
                kind: guess_kind(name).to_string(),
                data: Some(STANDARD.encode(&bytes)),
                parent_id: parent,
                is_public: public,
            })
            .await
            .with_context(|| format!("failed to upload {}", path.display()))?;

        println!(
            "Uploaded {} (id {}, {} bytes, {})",
            record.name,
            record.id,
            bytes.len(),
            record.kind
        );
    }
    Ok(())
}

async fn handle_list(parent: i64, page: i64, api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;
    let records = client.list(parent, page).await?;

    if records.is_empty() {
        println!("No files on this page.");
        return Ok(());
    }

    println!(
        "{:<8} {:<8} {:<32} {:<8} {:<8}",
        "ID", "Parent", "Name", "Type", "Public"
    );
    println!("{}", "-".repeat(68));
    for record in records {
        println!(
            "{:<8} {:<8} {:<32} {:<8} {:<8}",
            record.id, record.parent_id, record.name, record.kind, record.is_public
        );
    }
    Ok(())
}

async fn handle_show(id: i64, api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;
    let record = client.show(id).await?;

    println!("ID: {}", record.id);
    println!("Name: {}", record.name);
    println!("Type: {}", record.kind);
    println!("Owner ID: {}", record.owner_id);
    println!("Parent ID: {}", record.parent_id);
    println!("Public: {}", record.is_public);
    Ok(())
}

async fn handle_cat(id: i64, api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api).await?;
    let bytes = client.fetch_data(id).await?;

    std::io::stdout().write_all(&bytes)?;
    Ok(())
}

/// Images get their own kind; everything else is a plain file.
fn guess_kind(name: &str) -> &'static str {
    match mime_guess::from_path(name).first() {
        Some(mime) if mime.type_() == mime_guess::mime::IMAGE => "image",
        _ => "file",
    }
}

fn read_password(password: Option<String>, password_stdin: bool) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    if password_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        let password = buf.trim().to_string();
        if password.is_empty() {
            anyhow::bail!("password read from stdin is empty");
        }
        return Ok(password);
    }
    anyhow::bail!("password required: use --password or --password-stdin");
}

fn normalize_base_url(url: &str) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("server URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}

async fn get_api_client(api: &ApiArgs) -> Result<ApiClient> {
    let config_path = client_config_path(api.client.client_config.as_deref())?;
    let config = load_client_config(&config_path).await?;

    let server = api.server.clone().or(config.server).ok_or_else(|| {
        anyhow::anyhow!("no server known: pass --server, set CABINET_SERVER, or log in first")
    })?;
    let base_url = normalize_base_url(&server)?;

    let token = api.token.clone().or(config.token);
    ApiClient::new(&base_url, token.as_deref())
}

/// Saved session state.
#[derive(Debug, serde::Serialize, serde::Deserialize, Default)]
#[serde(default)]
struct ClientConfig {
    server: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

fn client_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }

    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(path) => PathBuf::from(path),
        None => {
            let home = std::env::var_os("HOME")
                .ok_or_else(|| anyhow::anyhow!("HOME not set; set CABINET_CLIENT_CONFIG"))?;
            PathBuf::from(home).join(".config")
        }
    };

    Ok(base.join("cabinet").join("client.toml"))
}

async fn load_client_config(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    Figment::new()
        .merge(Toml::file(path))
        .extract()
        .map_err(|err| anyhow::anyhow!(err).context("failed to load client configuration"))
}

async fn save_client_config(path: &Path, config: &ClientConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let contents = toml::to_string_pretty(config)?;

    tokio::fs::write(path, contents).await?;

    // Restrictive permissions (0600) since the file contains the token
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(path, perms).await?;
    }

    Ok(())
}
