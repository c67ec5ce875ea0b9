use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use campus_client::observability;
use campus_client::pages::messages::peer_id;
use campus_client::pages::{ActivitiesPage, FriendsPage, MessagesPage, PostsPage, ProfilePage};
use campus_client::session::LoginPage;
use campus_client::view::{MemorySurface, Surface};
use campus_client::{ApiClient, AppError, AppResult, ClientConfig, PageSession, SessionOutcome};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Page {
    Login,
    Activities,
    Friends,
    Messages,
    Posts,
    Profile,
}

/// Loads one page of the campus site headlessly and prints what it rendered.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(value_enum)]
    page: Page,

    /// Chat to open on the messages page.
    #[arg(long)]
    user_id: Option<String>,

    /// Search keyword (activities, friends).
    #[arg(long)]
    keyword: Option<String>,

    /// Activity type filter.
    #[arg(long = "type", value_name = "TYPE")]
    activity_type: Option<String>,

    /// Post to open on the posts page.
    #[arg(long)]
    post_id: Option<i64>,

    /// Keep the messages page polling and print after every period.
    #[arg(long)]
    watch: bool,

    /// Log in first with these credentials.
    #[arg(long, requires = "password")]
    username: Option<String>,

    #[arg(long, requires = "username")]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    observability::init_tracing();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(
                component = "cli",
                code = ?err.code,
                message = %err.message,
                details = err.details.as_deref().unwrap_or(""),
                "campus-client failed"
            );
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> AppResult<()> {
    let config = ClientConfig::from_env().map_err(|e| {
        AppError::validation("Invalid configuration").with_details(e.to_string())
    })?;
    let api = ApiClient::new(&config)?;
    let memory = Arc::new(MemorySurface::new());
    let surface: Arc<dyn Surface> = memory.clone();

    match (&args.username, &args.password) {
        (Some(username), Some(password)) => {
            let login = LoginPage::new(api.clone(), surface.clone(), config.clone());
            let logged_in = login.submit(username, password).await.is_ok();
            if !logged_in || args.page == Page::Login {
                return print_snapshot(&memory);
            }
        }
        _ if args.page == Page::Login => {
            return Err(AppError::validation(
                "The login page needs --username and --password",
            ));
        }
        _ => {}
    }

    let ctx = match PageSession::establish(api, surface, config).await {
        SessionOutcome::Active(ctx) => ctx,
        SessionOutcome::Redirected => return print_snapshot(&memory),
    };

    match args.page {
        Page::Login => {}
        Page::Activities => {
            let page = ActivitiesPage::new(ctx);
            if args.keyword.is_some() || args.activity_type.is_some() {
                page.search(
                    args.keyword.as_deref().unwrap_or_default(),
                    args.activity_type.as_deref().unwrap_or_default(),
                )
                .await;
            } else {
                page.load().await;
            }
        }
        Page::Friends => {
            let page = FriendsPage::new(ctx);
            page.load().await;
            if let Some(keyword) = args.keyword.as_deref() {
                page.search(keyword).await;
            }
        }
        Page::Messages => {
            let period = ctx.config.poll_interval;
            let peer = match args.user_id.as_deref() {
                Some(raw) => Some(
                    peer_id(raw)
                        .ok_or_else(|| AppError::validation(format!("Invalid user id {raw:?}")))?,
                ),
                None => None,
            };
            let page = MessagesPage::start(ctx, peer).await;
            if args.watch && page.is_polling() {
                return watch(&memory, period).await;
            }
        }
        Page::Posts => {
            let page = PostsPage::new(ctx);
            page.load().await;
            if let Some(post_id) = args.post_id {
                page.open_post(post_id).await;
            }
        }
        Page::Profile => {
            ProfilePage::new(ctx).load().await;
        }
    }

    print_snapshot(&memory)
}

/// Prints the surface once per poll period until interrupted.
async fn watch(memory: &MemorySurface, period: Duration) -> AppResult<()> {
    loop {
        print_snapshot(memory)?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = tokio::time::sleep(period) => {}
        }
    }
}

fn print_snapshot(memory: &MemorySurface) -> AppResult<()> {
    let snapshot = serde_json::to_string_pretty(&memory.snapshot())?;
    println!("{snapshot}");
    Ok(())
}
