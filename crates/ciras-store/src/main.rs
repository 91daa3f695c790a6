use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use ciras_model::{Category, CommentDraft, IssueDraft, IssueId, IssueStatus, User, DEPARTMENTS};
use ciras_store::storage::{FileStorage, Storage, WriteBehindStorage};
use ciras_store::{
    credentials, effective_status, seed, IssueFilter, IssueStore, PersistenceMode, SessionProvider,
    StoreConfig,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("ciras")
        .version(ciras_store::VERSION)
        .about("Campus issue reporting and tracking")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Override the data directory"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("login")
                .about("Log in as admin or department staff")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout").about("End the current session"))
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(
            Command::new("submit")
                .about("Report a new issue")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .value_parser(|s: &str| s.parse::<Category>())
                        .help("Category label, e.g. \"Hostels & Accommodation\""),
                )
                .arg(Arg::new("location").long("location").required(true))
                .arg(Arg::new("description").long("description").required(true))
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Reporter name; omitted reports come from \"Anonymous Student\""),
                )
                .arg(
                    Arg::new("anonymous")
                        .long("anonymous")
                        .action(ArgAction::SetTrue)
                        .help("Hide the reporter from the issue"),
                )
                .arg(Arg::new("image").long("image").help("Attachment reference")),
        )
        .subcommand(
            Command::new("assign")
                .about("Assign an issue to a department")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("department").long("department").required(true)),
        )
        .subcommand(
            Command::new("status")
                .about("Change the status of an issue")
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("status")
                        .required(true)
                        .value_parser(|s: &str| s.parse::<IssueStatus>())
                        .help("submitted | assigned | in-progress | resolved"),
                ),
        )
        .subcommand(
            Command::new("deadline")
                .about("Set the resolution deadline of an issue")
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("at")
                        .required(true)
                        .help("YYYY-MM-DD or an RFC 3339 timestamp"),
                ),
        )
        .subcommand(
            Command::new("comment")
                .about("Comment on an issue")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("text").required(true)),
        )
        .subcommand(
            Command::new("list")
                .about("List issues")
                .arg(Arg::new("id").long("id").help("Match ids containing this text"))
                .arg(Arg::new("department").long("department"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_parser(|s: &str| s.parse::<IssueStatus>()),
                )
                .arg(Arg::new("student").long("student").help("Only issues reported by this student"))
                .arg(
                    Arg::new("unassigned")
                        .long("unassigned")
                        .action(ArgAction::SetTrue)
                        .help("Only issues without a department"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("overdue")
                .about("List overdue issues")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("stats")
                .about("Show dashboard aggregates")
                .arg(Arg::new("department").long("department"))
                .arg(
                    Arg::new("top")
                        .long("top")
                        .default_value("5")
                        .value_parser(value_parser!(usize))
                        .help("Number of locations to show"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("track")
                .about("Track an issue by id")
                .arg(Arg::new("id").required(true))
                .arg(json_flag()),
        )
        .subcommand(Command::new("seed").about("Insert demo issues into an empty installation"))
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<StoreConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => StoreConfig::new(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let config = load_config(&matches)?;
    let files: Arc<dyn Storage> = Arc::new(
        FileStorage::open(&config.data_dir)
            .with_context(|| format!("opening data directory {}", config.data_dir.display()))?,
    );

    match config.persistence {
        PersistenceMode::WriteThrough => run(&matches, &config, files),
        PersistenceMode::WriteBehind => {
            let (storage, writer) = WriteBehindStorage::spawn(files);
            let storage = Arc::new(storage);
            let result = run(&matches, &config, Arc::clone(&storage) as Arc<dyn Storage>);
            storage.flush().await.context("flushing queued writes")?;
            if storage.failed_writes() > 0 {
                tracing::error!(failed = storage.failed_writes(), "some writes did not reach disk");
            }
            drop(storage);
            writer.await.context("waiting for the storage writer")?;
            result
        }
    }
}

fn run(matches: &ArgMatches, config: &StoreConfig, storage: Arc<dyn Storage>) -> Result<()> {
    let session = SessionProvider::open(Arc::clone(&storage), config.keys.user.clone());
    let store = IssueStore::open(Arc::clone(&storage), config.clone());

    match matches.subcommand() {
        Some(("login", args)) => {
            let username = arg_str(args, "username");
            let password = arg_str(args, "password");
            let Some(user) = credentials::authenticate(username, password) else {
                bail!("invalid username or password");
            };
            println!("Logged in as {} ({})", user.name, user.role);
            session.set_current_user(user);
        }
        Some(("logout", _)) => {
            session.logout();
            println!("Logged out");
        }
        Some(("whoami", _)) => match session.current_user() {
            Some(user) => {
                print!("{} ({})", user.name, user.role);
                if let Some(department) = &user.department {
                    print!(" - {department}");
                }
                println!();
            }
            None => println!("Not logged in"),
        },
        Some(("submit", args)) => {
            let category = args
                .get_one::<Category>("category")
                .copied()
                .context("missing category")?;
            let name = args.get_one::<String>("name").map(String::as_str);
            let reporter = User::student(name);
            let mut draft = IssueDraft::new(category, arg_str(args, "location"), arg_str(args, "description"));
            if args.get_flag("anonymous") {
                draft = draft.anonymous();
            }
            draft = draft.reported_by(name);
            if let Some(image) = args.get_one::<String>("image") {
                draft = draft.with_image(image.clone());
            }

            let issue = store.add_issue(draft, Some(&reporter));
            seed::mark_real_issue(storage.as_ref())?;
            println!("Submitted {}", issue.id);
            println!("Suggested department: {}", category.suggested_department());
        }
        Some(("assign", args)) => {
            let actor = require_user(&session)?;
            let department = arg_str(args, "department");
            if !DEPARTMENTS.contains(&department) {
                bail!("unknown department {department:?}; expected one of {}", DEPARTMENTS.join(", "));
            }
            let issue = store.assign_issue_to_department(&issue_id(args), department, &actor)?;
            println!("{} assigned to {department} ({})", issue.id, issue.status);
        }
        Some(("status", args)) => {
            let actor = require_user(&session)?;
            let status = args
                .get_one::<IssueStatus>("status")
                .copied()
                .context("missing status")?;
            let issue = store.update_issue_status(&issue_id(args), status, &actor)?;
            println!("{} is now {}", issue.id, issue.status);
        }
        Some(("deadline", args)) => {
            let actor = require_user(&session)?;
            let deadline = parse_deadline(arg_str(args, "at"))?;
            let issue = store.set_deadline(&issue_id(args), deadline, &actor)?;
            println!("{} due {}", issue.id, deadline.to_rfc3339());
        }
        Some(("comment", args)) => {
            let actor = require_user(&session)?;
            let issue = store.add_comment(&issue_id(args), CommentDraft::by(&actor, arg_str(args, "text")))?;
            println!("{} now has {} comment(s)", issue.id, issue.comments.len());
        }
        Some(("list", args)) => {
            let issues = if let Some(student) = args.get_one::<String>("student") {
                store.issues_by_student(student)
            } else if args.get_flag("unassigned") {
                store.unassigned_issues()
            } else {
                let mut filter = IssueFilter::new();
                if let Some(fragment) = args.get_one::<String>("id") {
                    filter = filter.id_contains(fragment.clone());
                }
                if let Some(department) = args.get_one::<String>("department") {
                    filter = filter.department(department.clone());
                }
                if let Some(status) = args.get_one::<IssueStatus>("status") {
                    filter = filter.status(*status);
                }
                store.search(&filter)
            };
            print_issues(&store, &issues, args.get_flag("json"))?;
        }
        Some(("overdue", args)) => {
            print_issues(&store, &store.overdue_issues(), args.get_flag("json"))?;
        }
        Some(("stats", args)) => {
            let department = args.get_one::<String>("department").map(String::as_str);
            let top = args.get_one::<usize>("top").copied().unwrap_or(5);
            print_stats(&store, department, top, args.get_flag("json"))?;
        }
        Some(("track", args)) => {
            let id = issue_id(args);
            let Some(issue) = store.track_issue(&id) else {
                bail!("no issue with id {id}");
            };
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&issue)?);
            } else {
                println!("{} [{}]", issue.id, effective_status(&issue, store.now()));
                println!("  {} at {}", issue.category, issue.location);
                println!("  {}", issue.description);
                println!("  reported by {}", issue.reporter().unwrap_or("Anonymous"));
                if let Some(department) = &issue.department_assigned {
                    println!("  department: {department}");
                }
                if let Some(deadline) = issue.deadline {
                    println!("  deadline: {}", deadline.to_rfc3339());
                }
                for entry in &issue.activity_log {
                    println!(
                        "  {} {} by {} ({})",
                        entry.timestamp.to_rfc3339(),
                        entry.action,
                        entry.actor,
                        entry.actor_role
                    );
                }
                for comment in &issue.comments {
                    println!("  > {} ({}): {}", comment.author, comment.author_role, comment.content);
                }
            }
        }
        Some(("seed", _)) => {
            let seeded = seed::seed_demo_issues(&store, storage.as_ref())?;
            println!("Seeded {seeded} demo issue(s)");
        }
        _ => unreachable!("subcommand is required"),
    }

    if store.persist_failures() > 0 {
        bail!("{} write(s) to storage failed; see logs", store.persist_failures());
    }
    Ok(())
}

fn arg_str<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name).map_or("", String::as_str)
}

fn issue_id(args: &ArgMatches) -> IssueId {
    IssueId::from(arg_str(args, "id"))
}

fn require_user(session: &SessionProvider) -> Result<User> {
    session
        .current_user()
        .context("not logged in; run `ciras login` first")
}

fn parse_deadline(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid deadline {text:?}"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

fn print_issues(store: &IssueStore, issues: &[Arc<ciras_model::Issue>], json: bool) -> Result<()> {
    if json {
        let plain: Vec<&ciras_model::Issue> = issues.iter().map(Arc::as_ref).collect();
        println!("{}", serde_json::to_string_pretty(&plain)?);
        return Ok(());
    }
    if issues.is_empty() {
        println!("No issues");
        return Ok(());
    }
    let now = store.now();
    for issue in issues {
        println!(
            "{:<30} {:<12} {:<36} {:<28} {}",
            issue.id,
            effective_status(issue, now).as_str(),
            issue.category.label(),
            issue.location,
            issue.department_assigned.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn print_stats(store: &IssueStore, department: Option<&str>, top: usize, json: bool) -> Result<()> {
    let stats = store.department_stats(department);
    let breakdown = store.status_breakdown();
    if json {
        let report = serde_json::json!({
            "stats": stats,
            "statusBreakdown": breakdown,
            "departments": store.department_overview(),
            "resolutionRate": store.resolution_rate(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Scope: {}", department.unwrap_or("all departments"));
    println!("  total:    {}", stats.total_issues);
    println!("  resolved: {}", stats.resolved);
    println!("  pending:  {}", stats.pending);
    println!("  overdue:  {}", stats.overdue);
    println!("  avg resolution: {:.1}h", stats.avg_resolution_time);
    println!("Resolution rate: {}%", store.resolution_rate());
    println!(
        "Status: submitted {} / assigned {} / in-progress {} / resolved {} / overdue {}",
        breakdown.submitted, breakdown.assigned, breakdown.in_progress, breakdown.resolved, breakdown.overdue
    );
    println!("By category:");
    for (category, count) in store.category_breakdown() {
        println!("  {count:>4}  {category}");
    }
    println!("Top locations:");
    for (location, count) in store.location_breakdown(top) {
        println!("  {count:>4}  {location}");
    }
    println!("Per day:");
    for (day, count) in store.daily_timeline() {
        println!("  {day}  {count}");
    }
    println!("Departments:");
    for dept in store.department_overview() {
        println!(
            "  {:<20} total {:>3}  resolved {:>3}  pending {:>3}  overdue {:>3}",
            dept.name.as_deref().unwrap_or("-"),
            dept.total_issues,
            dept.resolved,
            dept.pending,
            dept.overdue
        );
    }
    Ok(())
}
