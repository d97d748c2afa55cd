use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

use wedding_planner::{
    budget_totals, category_breakdown, chart_series, export_guest_csv, filtered_list,
    table_occupancy, unseated_guests, CategoryKind, Committed, EntityStore, GuestFilter,
    PlannerConfig, Relation, Rsvp, SqliteAdapter,
};

const USAGE: &str = "\
Usage: wedding-planner [--config <path>] <command>

Commands:
  summary                 Dashboard numbers (default)
  demo                    Replace everything with the sample wedding
  import <guests.csv>     Merge a guest spreadsheet into the guest list
  export <guests.csv>     Write the guest list as a spreadsheet
  guests [search] [--relation family|friends|work] [--rsvp yes|no|maybe]
  seating                 Table occupancy and unseated guests
  reset                   Delete all saved data";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config_path = take_flag(&mut args, "--config")?.map(PathBuf::from);
    let config = PlannerConfig::resolve(config_path.as_deref())?;

    let command = if args.is_empty() {
        "summary".to_string()
    } else {
        args.remove(0)
    };

    if command == "help" || command == "--help" {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut store = open_store(&config)?;

    match command.as_str() {
        "summary" => run_summary(&store, &config),
        "demo" => run_demo(&mut store, &config),
        "import" => run_import(&mut store, &args),
        "export" => run_export(&store, &args),
        "guests" => run_guests(&store, args),
        "seating" => run_seating(&store),
        "reset" => run_reset(&mut store),
        other => {
            eprintln!("{}", USAGE);
            bail!("Unknown command: {}", other)
        }
    }
}

/// Remove `--name value` from args and return the value
fn take_flag(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    match args.iter().position(|arg| arg == name) {
        None => Ok(None),
        Some(i) if i + 1 < args.len() => {
            let value = args.remove(i + 1);
            args.remove(i);
            Ok(Some(value))
        }
        Some(_) => bail!("{} needs a value", name),
    }
}

fn open_store(config: &PlannerConfig) -> Result<EntityStore> {
    let adapter = SqliteAdapter::open(&config.database_path)
        .with_context(|| format!("Failed to open database: {:?}", config.database_path))?;
    let mut store = EntityStore::open(Box::new(adapter)).context("Failed to load saved data")?;

    report_storage(store.apply_config(config));
    Ok(store)
}

/// Storage failures never undo a change; surface them and carry on
fn report_storage<T>(committed: Committed<T>) -> T {
    if let Some(err) = &committed.storage_error {
        eprintln!("⚠️  Change applied but not saved: {}", err);
    }
    committed.into_inner()
}

fn run_summary(store: &EntityStore, config: &PlannerConfig) -> Result<()> {
    let summary = store.summary();
    let money = |amount: f64| config.format_amount(amount);

    println!("💍 Wedding Planner Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n👥 Guests");
    println!(
        "   Confirmed: {} / {} ({}%)",
        summary.guests.done, summary.guests.total, summary.guests.percent
    );

    println!("\n✅ Tasks");
    println!(
        "   Completed: {} / {} ({}%)",
        summary.tasks.done, summary.tasks.total, summary.tasks.percent
    );

    println!("\n💰 Budget");
    println!(
        "   Spent: {} of {} ({}%)",
        money(summary.budget.done),
        money(summary.budget.total),
        summary.budget.percent
    );
    println!("   Remaining: {}", money(summary.remaining_budget));

    let totals = budget_totals(store.budget_items());
    println!(
        "   Planned {} · Deposits {} · Actual {}",
        money(totals.planned),
        money(totals.deposit),
        money(totals.actual)
    );

    let breakdown =
        category_breakdown(store.budget_items(), store.categories(CategoryKind::Budget));
    for slice in chart_series(&breakdown, false) {
        println!("   • {:<16} {:>12} {:>4}%", slice.name, money(slice.value), slice.percent);
    }

    println!("\n🤝 Vendors");
    println!(
        "   {} vendors, quotes total {}",
        summary.vendor_count,
        money(summary.vendor_quotes)
    );

    if store.has_unsaved_changes() {
        println!("\n⚠️  There are unsaved changes");
    }

    Ok(())
}

fn run_demo(store: &mut EntityStore, config: &PlannerConfig) -> Result<()> {
    println!("🎁 Loading demo wedding...");
    report_storage(store.load_demo().context("Failed to load demo data")?);
    println!(
        "✓ {} guests, {} tasks, {} budget lines, {} vendors, {} tables",
        store.guests().len(),
        store.tasks().len(),
        store.budget_items().len(),
        store.vendors().len(),
        store.tables().len()
    );
    println!();
    run_summary(store, config)
}

fn run_import(store: &mut EntityStore, args: &[String]) -> Result<()> {
    let path = args.first().context("import needs a CSV path")?;

    println!("📂 Loading {}...", path);
    let committed = store
        .import_guest_csv(path)
        .with_context(|| format!("Failed to import guest sheet: {}", path))?;
    let report = report_storage(committed);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Import complete");
    println!("   Added:   {}", report.added);
    println!("   Updated: {}", report.updated);
    if report.skipped > 0 {
        println!("   Skipped: {} (missing name or zero invited)", report.skipped);
    }
    println!("   Guest list now has {} entries", store.guests().len());

    Ok(())
}

fn run_export(store: &EntityStore, args: &[String]) -> Result<()> {
    let path = args.first().context("export needs a CSV path")?;

    export_guest_csv(path, store.guests())
        .with_context(|| format!("Failed to write guest sheet: {}", path))?;
    println!("💾 Exported {} guests to {}", store.guests().len(), path);

    Ok(())
}

fn run_guests(store: &EntityStore, mut args: Vec<String>) -> Result<()> {
    let relation = match take_flag(&mut args, "--relation")? {
        Some(text) => Some(
            Relation::parse(&text).with_context(|| format!("Unknown relation: {}", text))?,
        ),
        None => None,
    };
    let confirmed = match take_flag(&mut args, "--rsvp")? {
        Some(text) => {
            Some(Rsvp::parse(&text).with_context(|| format!("Unknown RSVP: {}", text))?)
        }
        None => None,
    };

    let filter = GuestFilter {
        search: Some(args.join(" ")).filter(|term| !term.is_empty()),
        relation,
        confirmed,
    };
    let guests = filtered_list(store.guests(), &filter);

    println!("👥 {} of {} guests", guests.len(), store.guests().len());
    for guest in &guests {
        println!(
            "   {:<24} {:<14} {:<8} x{:<3} {}",
            guest.full_name,
            guest.phone_number,
            guest.relation.as_str(),
            guest.invited_count,
            guest.confirmed.as_str()
        );
    }

    Ok(())
}

fn run_seating(store: &EntityStore) -> Result<()> {
    println!("🪑 Seating");
    for table in table_occupancy(store.tables(), store.guests()) {
        let flag = if table.over_capacity { " ⚠️  over capacity" } else { "" };
        println!("   {:<20} {}/{}{}", table.name, table.seated, table.capacity, flag);
    }

    let waiting = unseated_guests(store.guests(), store.tables());
    println!("\n   {} guests not seated", waiting.len());
    for guest in &waiting {
        println!("   • {}", guest.full_name);
    }

    Ok(())
}

fn run_reset(store: &mut EntityStore) -> Result<()> {
    store.clear().context("Failed to clear saved data")?;
    println!("🗑️  All wedding data deleted");
    Ok(())
}
