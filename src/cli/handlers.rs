use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use log::warn;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use qaza::auth::AuthClient;
use qaza::config::{AppConfig, BackendKind, Session, SessionFile};
use qaza::error::ProfileError;
use qaza::ledger::PrayerLedger;
use qaza::models::{Gender, LedgerSnapshot, NewProfile, PrayerType, UserProfile};
use qaza::store::{PrayerStore, ProfileStore, SqliteStore};
use qaza::utils::format::{format_count, format_delta, format_years};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup(
    config: &mut AppConfig,
    local: bool,
    url: Option<String>,
    anon_key: Option<String>,
) -> Result<()> {
    if local {
        config.backend.kind = BackendKind::Local;
    } else if url.is_some() || anon_key.is_some() {
        config.backend.kind = BackendKind::Remote;
        if let Some(url) = url {
            config.backend.url = url;
        }
        if let Some(key) = anon_key {
            config.backend.anon_key = key;
        }
        config.backend.remote_credentials()?;
    }
    config.save()?;

    println!();
    println_colored!(GREEN, "  ✓ Backend: {}", config.backend.kind.as_str());
    match config.backend.kind {
        BackendKind::Local => {
            println_colored!(DIM, "  Database: {}", AppConfig::db_path()?.display());
        }
        BackendKind::Remote => {
            println_colored!(DIM, "  Url:      {}", config.backend.url);
        }
    }
    println!();
    Ok(())
}

// ─── Account ─────────────────────────────────────────────────────────────────

pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: i32,
    pub gender: String,
}

pub async fn handle_register(
    config: &AppConfig,
    sessions: &SessionFile,
    form: Registration,
) -> Result<()> {
    let profile = NewProfile {
        email: form.email.trim().to_string(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        birth_year: form.birth_year,
        gender: Gender::from_str(&form.gender)?,
    };
    profile.validate(Local::now().year())?;

    let session = match config.backend.kind {
        BackendKind::Local => {
            let store = open_local()?;
            let user_id = store.register(&profile).await.context("Creating profile")?;
            Some(Session::local(&user_id, &profile.email))
        }
        BackendKind::Remote => {
            let (url, anon_key) = config.backend.remote_credentials()?;
            let password = prompt("  Password: ")?;
            let confirm = prompt("  Confirm password: ")?;
            if password != confirm {
                return Err(ProfileError::PasswordMismatch.into());
            }

            let signup = AuthClient::new(url, anon_key)
                .sign_up(&profile.email, &password)
                .await
                .context("Signing up")?;

            let mut store = qaza::store::RestStore::new(url, anon_key);
            if let Some(token) = signup.session.as_ref().and_then(|s| s.access_token.as_deref()) {
                store = store.with_access_token(token);
            }
            store
                .create_profile(&signup.user_id, &profile)
                .await
                .context("Creating profile")?;
            signup.session
        }
    };

    println!();
    match session {
        Some(session) => {
            sessions.save(&session)?;
            println_colored!(GREEN, "  ✓ Registered and signed in as {}", session.email);
        }
        None => {
            println_colored!(AMBER, "  Registered. Confirm your email, then run `qaza login`.");
        }
    }
    println!();
    Ok(())
}

pub async fn handle_login(config: &AppConfig, sessions: &SessionFile, email: &str) -> Result<()> {
    let email = email.trim();
    let session = match config.backend.kind {
        BackendKind::Local => {
            let user = open_local()?
                .find_by_email(email)
                .await
                .with_context(|| format!("No local account for {}", email))?;
            Session::local(&user.id, &user.email)
        }
        BackendKind::Remote => {
            let (url, anon_key) = config.backend.remote_credentials()?;
            let password = prompt("  Password: ")?;
            AuthClient::new(url, anon_key)
                .sign_in(email, &password)
                .await
                .context("Signing in")?
        }
    };
    sessions.save(&session)?;
    println_colored!(GREEN, "  ✓ Signed in as {}", session.email);
    Ok(())
}

pub async fn handle_logout(config: &AppConfig, sessions: &SessionFile) -> Result<()> {
    let session = sessions.load(config.backend.kind)?;
    if let (Some(token), BackendKind::Remote) = (
        session.as_ref().and_then(|s| s.access_token.as_deref()),
        config.backend.kind,
    ) {
        let (url, anon_key) = config.backend.remote_credentials()?;
        // The local session is dropped even if the server call fails.
        if let Err(e) = AuthClient::new(url, anon_key).sign_out(token).await {
            warn!("Remote sign-out failed: {}", e);
        }
    }
    if sessions.clear()? {
        println_colored!(GREEN, "  ✓ Signed out");
    } else {
        println_colored!(DIM, "  Not signed in");
    }
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub async fn handle_stats<S>(store: S, session: Option<&Session>) -> Result<()>
where
    S: PrayerStore + ProfileStore,
{
    let user_id = session.map(|s| s.user_id.as_str());
    let profile = match user_id {
        Some(id) => match store.profile(id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Could not load profile for {}: {}", id, e);
                None
            }
        },
        None => None,
    };

    let ledger = PrayerLedger::new(store);
    let snapshot = ledger.load_stats(user_id).await?;

    println!();
    print_profile(profile.as_ref(), session);
    print_snapshot(&snapshot);
    println!();
    Ok(())
}

pub async fn handle_adjust<S: PrayerStore>(
    store: S,
    session: Option<&Session>,
    prayer: &str,
    delta: i64,
) -> Result<()> {
    let user_id = session.map(|s| s.user_id.as_str()).unwrap_or_default();
    let ledger = PrayerLedger::new(store);
    let prayer = PrayerType::from_str(prayer)?;
    let snapshot = ledger.increment(user_id, prayer, delta).await?;

    let color = if delta > 0 { RED } else { GREEN };
    println_colored!(
        color,
        "  {} {} — now {}",
        format_delta(delta),
        prayer.display_name(),
        format_count(snapshot.skipped(prayer))
    );
    println_colored!(
        DIM,
        "  Total missed: {}  (~{} years)",
        format_count(snapshot.stats.total_skipped),
        format_years(snapshot.stats.years_skipped)
    );
    Ok(())
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn print_profile(profile: Option<&UserProfile>, session: Option<&Session>) {
    match (profile, session) {
        (Some(p), _) => {
            println_colored!(
                GOLD,
                "  [{}] {}  ·  {} years old",
                p.initials(),
                p.full_name(),
                p.age_in(Local::now().year())
            );
        }
        (None, Some(s)) => println_colored!(GOLD, "  {}", s.email),
        (None, None) => {
            println_colored!(AMBER, "  Not signed in. Run `qaza login` or `qaza register`.");
        }
    }
    println!();
}

fn print_snapshot(snapshot: &LedgerSnapshot) {
    println_colored!(
        BOLD,
        "  Missed prayers: {}    Years of missed prayers: {}",
        format_count(snapshot.stats.total_skipped),
        format_years(snapshot.stats.years_skipped)
    );
    println!();
    for (prayer, count) in snapshot.rows() {
        let line = format!(
            "  {:<10} {} rakats  {:>8}",
            prayer.display_name(),
            prayer.rakats(),
            format_count(count)
        );
        if count > 0 {
            println_colored!(AMBER, "{}", line);
        } else {
            println_colored!(DIM, "{}", line);
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

pub fn open_local() -> Result<SqliteStore> {
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    SqliteStore::open(&db_path).with_context(|| format!("Opening database at {:?}", db_path))
}

pub fn positive_count(count: i64) -> Result<i64> {
    if count <= 0 {
        bail!("--count must be a positive number, got {}", count);
    }
    Ok(count)
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}
