use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use portal_api::{ApiConfig, FileSessionStore};
use portal_core::entitlements::AddonTab;
use portal_core::model::{FeedbackAnswers, UserCourseId};
use serde::Serialize;
use services::{AppServices, FetchError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ui::vm::{
    CertificatesVm, CourseCardVm, CourseDetailVm, DeliverablesVm, FeedbackFormVm, NO_PAYMENTS,
    PaymentVm, ProfileVm, map_course_cards,
};
use ui::{AppContext, Loadable, Route, UiApp, ViewState, build_app_context};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(version, about = "Learner portal from the terminal", long_about = None)]
#[command(name = "portal")]
struct Cli {
    /// Where the signed-in session is kept between runs.
    #[arg(long, global = true, default_value = ".portal-session.json")]
    session_file: PathBuf,

    /// Overrides `PORTAL_API_BASE_URL`.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Overrides `PORTAL_TIMEOUT_SECS`. Must be at least 1.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Print view models as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a registered mobile number or email and the OTP sent to it.
    Login {
        identifier: String,
        #[arg(long)]
        otp: String,
    },
    Logout,
    Dashboard,
    Course {
        id: UserCourseId,
        /// Resource tab to open (syllabus, ebook, video, lab, quiz, interview, links).
        #[arg(long)]
        tab: Option<String>,
    },
    Profile,
    Certificates,
    Payments {
        course: UserCourseId,
    },
    Deliverables {
        course: UserCourseId,
    },
    Feedback {
        course: UserCourseId,
    },
    /// Open any portal path, e.g. `/course-details/12?tab=ebook`.
    Open {
        path: String,
    },
}

impl Commands {
    fn route(&self) -> Option<Route> {
        let route = match self {
            Commands::Login { .. } | Commands::Logout => return None,
            Commands::Dashboard => Route::Dashboard,
            Commands::Course { id, tab } => Route::CourseDetails {
                id: *id,
                tab: tab.as_deref().and_then(AddonTab::from_key),
            },
            Commands::Profile => Route::Profile,
            Commands::Certificates => Route::Certificates,
            Commands::Payments { course } => Route::Payment {
                course: Some(*course),
            },
            Commands::Deliverables { course } => Route::Deliverable {
                course: Some(*course),
            },
            Commands::Feedback { course } => Route::Feedback {
                course: Some(*course),
            },
            Commands::Open { path } => Route::parse(path),
        };
        Some(route)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PORTAL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn api_config(cli: &Cli) -> AppResult<ApiConfig> {
    let mut config = ApiConfig::from_env()?;
    if let Some(base) = &cli.api_base_url {
        config = config.with_base_url(base.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

/// Run one load through a [`Loadable`] and hand back what the view would show.
async fn fetch<T, F>(load: F) -> ViewState<T>
where
    T: Clone,
    F: Future<Output = Result<T, FetchError>>,
{
    let state = Loadable::new();
    state.load(load).await;
    state.snapshot()
}

struct Printer {
    json: bool,
}

impl Printer {
    fn show<T: Serialize>(&self, state: ViewState<T>, text: impl FnOnce(&T)) -> AppResult<()> {
        match state {
            ViewState::Ready(vm) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&vm)?);
                } else {
                    text(&vm);
                }
                Ok(())
            }
            ViewState::Error(error) => Err(error.message().to_owned().into()),
            ViewState::Idle | ViewState::Loading => Ok(()),
        }
    }

    fn note(&self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "message": message }));
        } else {
            println!("{message}");
        }
    }
}

fn print_card(card: &CourseCardVm) {
    println!("{}  [{}]", card.title, card.status);
    println!("  Duration {}   Dates {}", card.duration, card.dates);
    println!("  {} {}%", card.progress_label, card.progress_percent);
    let actions = [&card.payment, &card.feedback, &card.certificate]
        .iter()
        .map(|action| {
            if action.enabled {
                action.label.to_owned()
            } else {
                format!("({})", action.label)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {actions}");
    let unlocked: Vec<&str> = card
        .icon_links
        .iter()
        .filter(|link| link.enabled)
        .map(|link| link.label)
        .collect();
    if !unlocked.is_empty() {
        println!("  Resources: {}", unlocked.join(", "));
    }
    if let Some(link) = &card.header_link {
        println!("  {link}");
    }
}

async fn render(ctx: &AppContext, route: &Route, out: &Printer) -> AppResult<()> {
    debug!(path = %route, "rendering page");
    let courses = ctx.courses();
    match route {
        Route::Login => {
            out.note("Please sign in: portal login <mobile-or-email> --otp <code>");
            Ok(())
        }
        Route::Privacy => {
            out.note("Privacy Policy: your data is only used to run your courses.");
            Ok(())
        }
        Route::ContactUs => {
            out.note("Contact Us: reach your training centre for course support.");
            Ok(())
        }
        Route::NotFound { path } => Err(format!("404 not found: {path}").into()),
        Route::Home | Route::Dashboard => {
            let state = fetch(async {
                let overviews = courses.overviews().await?;
                Ok::<_, FetchError>(map_course_cards(&overviews))
            })
            .await;
            out.show(state, |cards| {
                if cards.is_empty() {
                    println!("No courses yet.");
                }
                for card in cards {
                    print_card(card);
                }
            })
        }
        Route::CourseDetails { id, tab } => {
            let state = fetch(async {
                let overview = courses.course(*id).await?;
                let groups = courses.ebook_groups(&overview.course);
                Ok::<_, FetchError>(CourseDetailVm::new(&overview, groups, *tab))
            })
            .await;
            out.show(state, |vm| {
                println!("{}", vm.title);
                if vm.is_empty() {
                    println!("No resources are unlocked for this course.");
                }
                for tab in vm.tabs() {
                    let marker = if tab.active { "*" } else { " " };
                    println!(" {marker} {}", tab.label);
                }
                if vm.active_tab() == Some(AddonTab::Ebook) {
                    for group in vm.ebook_groups() {
                        let marker = if vm.is_open(&group.key) { "v" } else { ">" };
                        println!("   {marker} {}", group.key);
                        if vm.is_open(&group.key) {
                            for name in &group.names {
                                println!("       {name}");
                            }
                        }
                    }
                }
            })
        }
        Route::Certificates => {
            let state = fetch(async {
                let summary = courses.certificates().await?;
                Ok::<_, FetchError>(CertificatesVm::new(&summary, &courses))
            })
            .await;
            out.show(state, |vm| {
                println!("Total Certificates  {}", vm.total);
                println!("Last Achievement    {}", vm.last_achievement);
                for row in &vm.rows {
                    println!("  {}  {}", row.title, row.issued_on);
                    if let Some(url) = &row.download_url {
                        println!("    {url}");
                    }
                }
            })
        }
        Route::Payment { course: Some(id) } => {
            let state = fetch(async {
                let overview = courses.course(*id).await?;
                let summary = courses.payments(*id).await?;
                Ok::<_, FetchError>(PaymentVm::new(&overview.course.title, &summary))
            })
            .await;
            out.show(state, |vm| {
                if vm.is_empty() {
                    println!("{NO_PAYMENTS}");
                    return;
                }
                println!("{}  {}  ({})", vm.course, vm.total_paid, vm.status.label());
                for row in &vm.rows {
                    println!("  {}  {}  {}  paid", row.date, row.receipt_no, row.amount);
                }
            })
        }
        Route::Deliverable { course: Some(id) } => {
            let state = fetch(async {
                let groups = courses.deliverables(*id).await?;
                Ok::<_, FetchError>(DeliverablesVm::new(&groups))
            })
            .await;
            out.show(state, |vm| {
                for group in &vm.groups {
                    println!("{}", group.title);
                    for item in &group.items {
                        println!("  {}  {}", item.name, item.kind);
                    }
                }
            })
        }
        Route::Feedback { course: Some(id) } => {
            let feedback = ctx.feedback();
            let state = fetch(async {
                let overview = courses.course(*id).await?;
                let form = feedback.load_form(*id).await?;
                Ok::<_, FetchError>((
                    overview.feedback,
                    FeedbackFormVm::new(&overview.course.title, &form, &FeedbackAnswers::new(), false),
                ))
            })
            .await;
            let state = match state {
                ViewState::Ready((availability, vm)) => {
                    if let Some(message) = availability.message() {
                        out.note(message);
                    }
                    ViewState::Ready(vm)
                }
                ViewState::Error(error) => ViewState::Error(error),
                ViewState::Idle | ViewState::Loading => ViewState::Idle,
            };
            out.show(state, |vm| {
                println!("{}", vm.title);
                for question in &vm.questions {
                    println!("{}", question.label);
                    for option in &question.options {
                        println!("   ( ) {}", option.name);
                    }
                }
            })
        }
        Route::Payment { course: None }
        | Route::Deliverable { course: None }
        | Route::Feedback { course: None } => {
            out.note("Pick a course first, e.g. `portal payments <course-id>`.");
            Ok(())
        }
        Route::Profile => {
            let profiles = ctx.profiles();
            let state = fetch(async {
                let loaded = profiles.load().await?;
                Ok::<_, FetchError>(ProfileVm::from(&loaded))
            })
            .await;
            out.show(state, |vm| {
                println!("{}  ({})", vm.header.display_name, vm.header.completion_label);
                if let Some(total) = &vm.total_experience {
                    println!("Experience: {total}");
                }
                for section in &vm.sections {
                    println!("\n{}", section.title);
                    for row in &section.rows {
                        println!("  {:<16}{}", row.label, row.value);
                    }
                }
            })
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = api_config(&cli)?;
    let store = Arc::new(FileSessionStore::new(cli.session_file.clone()));
    let services = AppServices::http(config, store)?;
    let app: Arc<dyn UiApp> = Arc::new(services);
    let ctx = build_app_context(&app);
    let out = Printer { json: cli.json };

    match &cli.command {
        Commands::Login { identifier, otp } => {
            let session = ctx.auth().login(identifier, otp).await?;
            let name = &session.identity().first_name;
            out.note(&format!("Signed in as {name}."));
            Ok(())
        }
        Commands::Logout => {
            ctx.auth().logout()?;
            out.note("Signed out.");
            Ok(())
        }
        command => {
            let Some(requested) = command.route() else {
                return Ok(());
            };
            let route = requested.clone().guard(ctx.session().is_signed_in());
            if route != requested {
                info!(from = %requested, to = %route, "redirected");
            }
            render(&ctx, &route, &out).await
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
