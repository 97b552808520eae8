// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terminal front end for CleanStreet.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use cleanstreet::client::{ApiClient, Attachment, DEFAULT_API_URL};
use cleanstreet::forms::register::Field;
use cleanstreet::forms::{FeedbackForm, FieldErrors, IssueForm, LoginForm, RegisterForm};
use cleanstreet::guard::{self, Navigation};
use cleanstreet::models::Status;
use cleanstreet::session::SessionStore;
use cleanstreet::views::render::{complaint_card, feedback_table};
use cleanstreet::views::{
    AdminComplaintList, FeedbackList, ListState, Prompt, UserComplaintList,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cleanstreet-cli", about = "Report and track neighborhood issues")]
struct Cli {
    #[arg(long, env = "CLEANSTREET_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "CLEANSTREET_SESSION", default_value = "cleanstreet-session.json")]
    session_file: PathBuf,

    /// Answer yes to every confirmation
    #[arg(long, short = 'y')]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up
    Health,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register(RegisterArgs),
    Logout,
    Whoami,
    /// Show where a client route leads for the current session
    Open { path: String },
    /// File a new report
    Report(IssueArgs),
    /// Edit one of your reports
    Edit {
        id: u64,
        #[command(flatten)]
        issue: IssueArgs,
    },
    /// All complaints (admin)
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Your own complaints
    Mine,
    Show { id: u64 },
    /// Change a complaint's status (admin)
    Status { id: u64, status: Status },
    Delete { id: u64 },
    Feedback(FeedbackArgs),
    /// Submitted feedback (admin)
    FeedbackList,
    Locations,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Defaults to --password
    #[arg(long)]
    confirm_password: Option<String>,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    zip_code: String,
    #[arg(long)]
    neighborhood: String,
    #[arg(long)]
    agree_to_terms: bool,
}

#[derive(Args, Debug)]
struct IssueArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    severity: Option<u8>,
    #[arg(long)]
    anonymous: bool,
    #[arg(long)]
    contact_name: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
    #[arg(long)]
    contact_phone: Option<String>,
    #[arg(long)]
    no_follow_up: bool,
    /// Photo or video to attach (repeatable; only the first is uploaded)
    #[arg(long = "media")]
    media: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct FeedbackArgs {
    #[arg(long)]
    subject: String,
    #[arg(long)]
    message: String,
    #[arg(long)]
    contact_name: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
}

/// Confirmations on stdin, alerts on stdout.
struct TerminalPrompt {
    assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", message);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }

    fn alert(&mut self, message: &str) {
        println!("{}", message);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut session = SessionStore::open(&cli.session_file);
    let client = ApiClient::new(&cli.api_url)?.with_token(session.token().map(str::to_string));
    let mut prompt = TerminalPrompt {
        assume_yes: cli.yes,
    };

    match cli.command {
        Command::Health => {
            let health = client.health().await?;
            println!("{} (version {}, build {})", health.status, health.version, health.build_id);
        }
        Command::Login { email, password } => {
            let mut form = LoginForm::new();
            form.set_email(email);
            form.set_password(password);
            match form.submit(&client, &mut session).await {
                Some(landing) => println!("Logged in. Continue at {}", landing),
                None => fail(form.errors())?,
            }
        }
        Command::Register(args) => register(&client, args).await?,
        Command::Logout => {
            session.logout()?;
            println!("Logged out.");
        }
        Command::Whoami => match session.user() {
            Some(user) => println!("{} <{}> [{}] id={}", user.name, user.email, user.role, user.id),
            None => println!("Not logged in."),
        },
        Command::Open { path } => match guard::navigate(&session.state(), &path) {
            Navigation::Loading => println!("Loading authentication..."),
            Navigation::Redirect(to) => println!("Redirect to {}", to),
            Navigation::Show(view) => println!("{:?}", view),
        },
        Command::Report(args) => {
            require_route(&session, guard::USER_DASHBOARD_PATH)?;
            let mut form = IssueForm::new_report(session.user());
            apply_issue_args(&mut form, args)?;
            submit_issue(&client, &session, &mut prompt, form).await?;
        }
        Command::Edit { id, issue } => {
            require_route(&session, &format!("/report-issue/{}", id))?;
            let complaint = client.get_complaint(id).await?;
            let mut form = IssueForm::edit(&complaint);
            apply_issue_args(&mut form, issue)?;
            submit_issue(&client, &session, &mut prompt, form).await?;
        }
        Command::List { search } => {
            require_route(&session, guard::ADMIN_DASHBOARD_PATH)?;
            let mut list = AdminComplaintList::new();
            list.load(&client).await;
            list.set_search(search);
            if let ListState::Error(e) = list.state() {
                bail!("Error loading complaints: {}", e);
            }
            match list.empty_message() {
                Some(message) => println!("{}", message),
                None => {
                    for complaint in list.visible() {
                        println!("{}", complaint_card(complaint, client.origin(), viewer(&session), true));
                    }
                }
            }
        }
        Command::Mine => {
            require_route(&session, guard::USER_DASHBOARD_PATH)?;
            let list = load_user_list(&client, &session).await?;
            match list.empty_message() {
                Some(message) => println!("{}", message),
                None => {
                    for complaint in list.state().items() {
                        println!("{}", complaint_card(complaint, client.origin(), viewer(&session), false));
                    }
                }
            }
        }
        Command::Show { id } => {
            require_route(&session, guard::USER_DASHBOARD_PATH)?;
            let complaint = client.get_complaint(id).await?;
            println!(
                "{}",
                complaint_card(&complaint, client.origin(), viewer(&session), session.is_admin())
            );
        }
        Command::Status { id, status } => {
            require_route(&session, guard::ADMIN_DASHBOARD_PATH)?;
            let mut list = AdminComplaintList::new();
            if !list.change_status(&client, &mut prompt, id, status).await {
                bail!("status not changed");
            }
        }
        Command::Delete { id } => {
            require_route(&session, guard::USER_DASHBOARD_PATH)?;
            let deleted = if session.is_admin() {
                let mut list = AdminComplaintList::new();
                list.load(&client).await;
                list.delete(&client, &mut prompt, id).await
            } else {
                let mut list = load_user_list(&client, &session).await?;
                list.delete(&client, &mut prompt, id).await
            };
            if !deleted {
                bail!("complaint {} not deleted", id);
            }
        }
        Command::Feedback(args) => {
            let mut form = FeedbackForm::new();
            form.set_subject(args.subject);
            form.set_message(args.message);
            if args.contact_name.is_some() || args.contact_email.is_some() {
                form.set_allow_contact(true);
                form.set_contact_name(args.contact_name.unwrap_or_default());
                form.set_contact_email(args.contact_email.unwrap_or_default());
            }
            match form.submit(&client).await {
                Some(feedback) => println!("Thank you for your feedback (#{}).", feedback.id),
                None => fail(form.errors())?,
            }
        }
        Command::FeedbackList => {
            require_route(&session, guard::ADMIN_DASHBOARD_PATH)?;
            let mut list = FeedbackList::new();
            list.load(&client).await;
            match (list.state(), list.empty_message()) {
                (ListState::Error(e), _) => bail!("{}", e),
                (_, Some(message)) => println!("{}", message),
                (state, None) => print!("{}", feedback_table(state.items())),
            }
        }
        Command::Locations => {
            require_route(&session, guard::USER_DASHBOARD_PATH)?;
            for location in client.list_locations().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    location.id,
                    location.area_name,
                    location.city.as_deref().unwrap_or("-"),
                    location.pincode.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

fn viewer(session: &SessionStore) -> Option<u64> {
    session.user().map(|u| u.id)
}

/// Apply the route gate for commands backed by a protected view.
fn require_route(session: &SessionStore, path: &str) -> anyhow::Result<()> {
    match guard::navigate(&session.state(), path) {
        Navigation::Show(_) => Ok(()),
        Navigation::Redirect(to) if to == guard::LOGIN_PATH => {
            bail!("Not logged in. Run `cleanstreet-cli login` first.")
        }
        Navigation::Redirect(to) => bail!("Access denied (redirected to {})", to),
        Navigation::Loading => bail!("Session not loaded"),
    }
}

/// Print field errors and fail.
fn fail(errors: &FieldErrors) -> anyhow::Result<()> {
    for (field, message) in errors.iter() {
        eprintln!("{}: {}", field, message);
    }
    bail!("{} problem(s) found", errors.len())
}

async fn load_user_list(
    client: &ApiClient,
    session: &SessionStore,
) -> anyhow::Result<UserComplaintList> {
    let user_id = viewer(session).context("Not logged in")?;
    let mut list = UserComplaintList::new(user_id);
    list.load(client).await;
    if let ListState::Error(e) = list.state() {
        bail!("Error loading your complaints: {}", e);
    }
    Ok(list)
}

async fn register(client: &ApiClient, args: RegisterArgs) -> anyhow::Result<()> {
    let mut form = RegisterForm::new();
    let confirm = args.confirm_password.unwrap_or_else(|| args.password.clone());
    form.set(Field::FirstName, args.first_name);
    form.set(Field::LastName, args.last_name);
    form.set(Field::Email, args.email);
    form.set(Field::Password, args.password);
    form.set(Field::ConfirmPassword, confirm);
    form.set(Field::Address, args.address);
    form.set(Field::City, args.city);
    form.set(Field::ZipCode, args.zip_code);
    form.set(Field::Neighborhood, args.neighborhood);
    form.set_agree_to_terms(args.agree_to_terms);

    let strength = form.password_strength();
    println!("Password strength: {} ({}/5)", strength.label, strength.score);

    while form.step() < cleanstreet::forms::register::TOTAL_STEPS {
        if !form.next() {
            return fail(form.errors());
        }
    }

    match form.submit(client).await {
        Some(next) => {
            println!("Registered. Continue at {}", next);
            Ok(())
        }
        None => fail(form.errors()),
    }
}

fn apply_issue_args(form: &mut IssueForm, args: IssueArgs) -> anyhow::Result<()> {
    if let Some(v) = args.category {
        form.set_category(v);
    }
    if let Some(v) = args.title {
        form.set_title(v);
    }
    if let Some(v) = args.description {
        form.set_description(v);
    }
    if let Some(v) = args.address {
        form.set_location_address(v);
    }
    if let Some(v) = args.severity {
        form.set_severity(v);
    }
    if let Some(v) = args.contact_name {
        form.set_contact_name(v);
    }
    if let Some(v) = args.contact_email {
        form.set_contact_email(v);
    }
    if let Some(v) = args.contact_phone {
        form.set_contact_phone(v);
    }
    form.set_anonymous(args.anonymous);
    form.set_allow_follow_up(!args.no_follow_up);

    let mut files = Vec::new();
    for path in &args.media {
        files.push(read_media(path)?);
    }
    for rejection in form.add_media(files) {
        eprintln!("{}", rejection);
    }
    Ok(())
}

fn read_media(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mov" => "video/mov",
        "avi" => "video/avi",
        _ => "application/octet-stream",
    };
    Ok(Attachment {
        file_name: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string(),
        mime: mime.to_string(),
        bytes,
    })
}

async fn submit_issue(
    client: &ApiClient,
    session: &SessionStore,
    prompt: &mut TerminalPrompt,
    mut form: IssueForm,
) -> anyhow::Result<()> {
    if !form.preview() {
        return fail(form.errors());
    }
    for (label, value) in form.summary() {
        println!("{:>12}: {}", label, value);
    }
    if !prompt.confirm("Submit this report?") {
        form.back_to_form();
        bail!("report not submitted");
    }

    match form.submit(client, session.user()).await {
        Some(complaint) => {
            println!(
                "Report saved successfully! Status: {} (#{})",
                complaint.status, complaint.id
            );
            Ok(())
        }
        None => fail(form.errors()),
    }
}
