use chrono::Utc;
use log::LevelFilter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tiershop::catalog::data_dir;
use tiershop::persistence::ShopStore;
use tiershop::random::RandomSource;
use tiershop::{BuyOutcome, FileCatalogLoader, FileStore, RerollOutcome, RngSource, ShopSession};

struct Args {
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
}

fn print_help() {
    println!("Tiershop - regional creature shop\n");
    println!("Usage: tiershop [--catalog PATH] [--config PATH] [-v]\n");
    println!("Commands (one per line on stdin):");
    println!("  show         Show the current shop");
    println!("  regions      List regions");
    println!("  select N     Select region N (not applied yet)");
    println!("  apply        Travel to the selected region");
    println!("  refresh      Rebuild the shop");
    println!("  money N      Add (or with -N remove) money");
    println!("  buy N        Buy slot N");
    println!("  reroll N     Reroll slot N");
    println!("  undo         Undo the last action");
    println!("  reset        Start over");
    println!("  history      Show recent events");
    println!("  quit         Exit");
}

fn parse_args() -> Args {
    let mut args = Args {
        catalog: None,
        config: None,
        verbose: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => args.catalog = iter.next().map(PathBuf::from),
            "--config" => args.config = iter.next().map(PathBuf::from),
            "-v" | "--verbose" => args.verbose = true,
            "--version" | "-V" => {
                println!("tiershop {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'tiershop --help' for usage.");
                std::process::exit(1);
            }
        }
    }
    args
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.parse_default_env();
    builder.init();
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn show<S: ShopStore, R: RandomSource>(session: &ShopSession<S, R>) {
    let state = session.state();
    let config = session.config();
    let region = state.current_region(config).unwrap_or("?");
    println!(
        "== {} | money {} | rerolls left {}/{} ==",
        region,
        state.money,
        state.rerolls_left(config),
        config.rerolls_per_region
    );
    if state.selected_region_index != state.current_region_index {
        if let Some(selected) = config.region_name(state.selected_region_index) {
            println!("(selected: {}, use 'apply' to travel)", selected);
        }
    }
    for (i, slot) in state.shop.iter().enumerate() {
        println!("{:>3}. {}", i, slot.label());
    }
}

fn parse_index(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|a| a.parse().ok())
}

fn main() -> io::Result<()> {
    let args = parse_args();
    init_logging(args.verbose);

    let dir = data_dir()?;
    let loader = FileCatalogLoader::new(
        args.catalog.unwrap_or_else(|| dir.join("catalog.json")),
        args.config.unwrap_or_else(|| dir.join("config.json")),
    );
    let store = FileStore::new()?;
    let mut session = ShopSession::bootstrap(&loader, store, RngSource::from_entropy());
    show(&session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        session.tick(now_ms());

        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let arg = parts.next();
        match command {
            "show" => show(&session),
            "regions" => {
                for (i, region) in session.config().regions.iter().enumerate() {
                    let marker = if i == session.state().current_region_index { "*" } else { " " };
                    println!("{}{:>2}. {}", marker, i, region);
                }
            }
            "select" => match parse_index(arg) {
                Some(i) if session.select_region(i) => println!("Selected region {}", i),
                _ => println!("No such region"),
            },
            "apply" => {
                session.apply_selected_region(now_ms());
                show(&session);
            }
            "refresh" => {
                session.refresh(now_ms());
                show(&session);
            }
            "money" => match arg.and_then(|a| a.parse::<i64>().ok()) {
                Some(amount) => {
                    session.add_money(amount, now_ms());
                    println!("Money: {}", session.state().money);
                }
                None => println!("Usage: money N"),
            },
            "buy" => match parse_index(arg).map(|i| session.buy(i, now_ms())) {
                Some(BuyOutcome::InsufficientFunds) => println!("Not enough money"),
                Some(BuyOutcome::Ignored) | None => println!("Nothing to buy there"),
                Some(_) => show(&session),
            },
            "reroll" => match parse_index(arg).map(|i| session.reroll(i, now_ms())) {
                Some(RerollOutcome::Replaced) => show(&session),
                Some(RerollOutcome::Exhausted) => println!("No replacement available"),
                Some(RerollOutcome::NoBudget) => println!("No rerolls left"),
                Some(RerollOutcome::Ignored) | None => println!("Nothing to reroll there"),
            },
            "undo" => {
                if session.undo(now_ms()) {
                    show(&session);
                } else {
                    println!("Nothing to undo");
                }
            }
            "reset" => {
                session.reset(now_ms());
                show(&session);
            }
            "history" => {
                for event in session.state().history.iter().take(15) {
                    let when = chrono::DateTime::from_timestamp_millis(event.timestamp)
                        .map(|t| t.format("%H:%M:%S").to_string())
                        .unwrap_or_default();
                    println!("{} [{}] {}", when, event.kind.name(), event.message);
                }
            }
            "quit" | "exit" => break,
            "help" => print_help(),
            other => println!("Unknown command: {} (try 'help')", other),
        }
    }
    Ok(())
}
