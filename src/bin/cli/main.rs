use std::{fs, io, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use dotenvy::{dotenv, var as envar};
use tracing::{info, Level};

mod command_parser;

use seriatim::{
    backup,
    catalog::GoogleBooks,
    config::Config,
    export::Export,
    identity::resolve_author,
    library::Library,
    matcher,
    recommend,
    restore,
    store::{Entity, MemoryStore, SqliteStore, Store},
    types::{
        book::Book,
        rating::Rating,
        series::Series,
        status::{ReadStatus, SeriesFilter, SeriesStatus},
        timestamp::Timestamp,
    },
};

/// `DATABASE_URL` (possibly from a `.env` file) wins over the configured location.
fn database_location(config: &Config) -> PathBuf {
    dotenv().ok();
    match envar("DATABASE_URL") {
        Ok(url) => PathBuf::from(url),
        Err(_) => config.database_path(),
    }
}

async fn connect_to_db(config: &Config) -> Result<SqliteStore> {
    let location = database_location(config);
    if let Some(parent) = location.parent().filter(|x| !x.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    info!("Using database at {}", location.display());
    Ok(SqliteStore::connect(location).await?)
}

fn log_level(config: &Config) -> Result<Level> {
    config
        .log_level
        .parse::<Level>()
        .with_context(|| format!("Invalid log_level {:?}", config.log_level))
}

fn init_logging(config: &Config) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(log_level(config)?)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn print_series(series: &Series, config: &Config) {
    let mut line = format!(
        "{} {} {}",
        config.output_status.format(series.status.abbreviation()),
        config.output_series.format(&series.name),
        config.output_author.format(&series.author),
    );
    if let Some(last) = series.last_read() {
        line.push_str(&format!(" {}", config.output_timestamp.format(last)));
    }
    println!("{line}");
    for book in &series.books {
        let mut line = format!("    {}", config.output_book.format(book));
        if let Some(rating) = book.rating {
            line.push_str(&format!(" {}", config.output_rating.format(rating)));
        }
        println!("{line}");
    }
}

async fn add_series(store: &mut SqliteStore, matches: &ArgMatches) -> Result<Series> {
    let name = required(matches, "name")?;
    let author = resolve_author(store, required(matches, "author")?).await?;
    let status = match matches.get_one::<String>("status") {
        Some(s) => s.parse::<SeriesStatus>()?,
        None => SeriesStatus::default(),
    };
    let mut series = Series::new(name, author, status)?;
    if let Some(notes) = matches.get_one::<String>("notes") {
        series.notes = notes.clone();
    }
    store.insert(Entity::Series(series.clone())).await?;
    store.save().await?;
    Ok(series)
}

async fn add_book(store: &mut SqliteStore, matches: &ArgMatches) -> Result<Book> {
    let library = Library::load(store).await?;
    let series_name = required(matches, "series")?;
    let series = library
        .find_series(series_name)
        .ok_or_else(|| anyhow!("No series named '{series_name}'"))?;
    let order = match matches.get_one::<i64>("order") {
        Some(order) => *order,
        None => series.books.iter().map(|x| x.series_order).max().unwrap_or(0) + 1,
    };
    let status = match matches.get_one::<String>("status") {
        Some(s) => s.parse::<ReadStatus>()?,
        None => ReadStatus::default(),
    };

    let mut book = Book::new(series.id, required(matches, "title")?, order, status)?;
    if let Some(author) = matches.get_one::<String>("author") {
        book.author = Some(resolve_author(store, author).await?);
    }
    book.start_date = parse_optional::<Timestamp>(matches, "start")?;
    book.end_date = parse_optional::<Timestamp>(matches, "end")?;
    book.rating = parse_optional::<Rating>(matches, "rating")?;
    if let Some(notes) = matches.get_one::<String>("notes") {
        book.notes = notes.clone();
    }
    book.normalize_for_status();

    store.insert(Entity::Book(book.clone())).await?;
    store.save().await?;
    Ok(book)
}

async fn remove(store: &mut SqliteStore, matches: &ArgMatches) -> Result<()> {
    let library = Library::load(store).await?;
    match matches.subcommand() {
        Some(("series", matches)) => {
            let name = required(matches, "name")?;
            let series = library
                .find_series(name)
                .ok_or_else(|| anyhow!("No series named '{name}'"))?;
            store.delete_series(&series.id).await?;
        }
        Some(("book", matches)) => {
            let series_name = required(matches, "series")?;
            let title = required(matches, "title")?;
            let book = library
                .find_series(series_name)
                .and_then(|s| s.books.iter().find(|x| x.title == title))
                .ok_or_else(|| anyhow!("No book '{title}' in series '{series_name}'"))?;
            store.delete_book(&book.id).await?;
        }
        Some((name, _)) => unimplemented!("{}", name),
        None => unreachable!("subcommand required"),
    }
    store.save().await?;
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing argument {id}"))
}

fn parse_optional<T>(matches: &ArgMatches, id: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(matches
        .get_one::<String>(id)
        .map(|x| x.parse::<T>())
        .transpose()?)
}

async fn handle_command(matches: ArgMatches, config: &Config) -> Result<()> {
    match matches.subcommand() {
        Some(("config", _)) => {
            print!("{}", Config::default_as_string()?);
        }
        Some(("import", matches)) => {
            let file = matches
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow!("Missing file"))?;
            let bytes = fs::read(file)?;
            let summary = if matches.get_flag("dry-run") {
                restore::import_document(&mut MemoryStore::new(), &bytes).await?
            } else {
                let mut store = connect_to_db(config).await?;
                restore::import_document(&mut store, &bytes).await?
            };
            println!(
                "Imported {} series, {} books and {} authors.",
                summary.series_count, summary.book_count, summary.author_count
            );
        }
        Some((command, matches)) => {
            let mut store = connect_to_db(config).await?;
            match command {
                "export" => {
                    let mut library = Library::load(&mut store).await?;
                    library.sort_by_name();
                    let json = backup::encode(&backup::export_to_document(&library.series))?;
                    match matches.get_one::<PathBuf>("output") {
                        Some(path) => fs::write(path, json)?,
                        None => println!("{json}"),
                    }
                }
                "reading" => {
                    let library = Library::load(&mut store).await?;
                    println!("{}", recommend::currently_reading(&library.series));
                }
                "next" => {
                    let library = Library::load(&mut store).await?;
                    match recommend::suggested_next_read(&library.series) {
                        Some(book) => println!("{}", config.output_book.format(&book.title)),
                        None => println!(),
                    }
                }
                "list" => {
                    let filter = match matches.get_one::<String>("status") {
                        Some(s) => s.parse::<SeriesFilter>()?,
                        None => SeriesFilter::Everything,
                    };
                    let mut library = Library::load(&mut store).await?;
                    library.sort_by_last_read();
                    for series in library.filtered(filter) {
                        print_series(series, config);
                    }
                }
                "search" => {
                    let series = required(matches, "series")?;
                    let catalog = GoogleBooks::new(&config.catalog)?;
                    let candidates = matcher::find_candidates(
                        &mut store,
                        &catalog,
                        series,
                        config.catalog.max_results,
                    )
                    .await?;
                    for info in candidates {
                        let number = info.series_number.as_deref().unwrap_or("?");
                        println!(
                            "#{number} {} {}",
                            config.output_book.format(&info.title),
                            config.output_author.format(info.authors.join(", ")),
                        );
                    }
                }
                "add" => match matches.subcommand() {
                    Some(("series", matches)) => {
                        let series = add_series(&mut store, matches).await?;
                        print_series(&series, config);
                    }
                    Some(("book", matches)) => {
                        let book = add_book(&mut store, matches).await?;
                        println!("{}", config.output_book.format(&book));
                    }
                    Some((name, _)) => unimplemented!("{}", name),
                    None => unreachable!("subcommand required"),
                },
                "remove" => remove(&mut store, matches).await?,
                "goodreads" => {
                    let library = Library::load(&mut store).await?;
                    Export::export(&Export::new(&library.series), io::stdout())?;
                }
                name => unimplemented!("{}", name),
            }
        }
        None => unreachable!("subcommand required"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = command_parser::arg_parser().get_matches();
    let config = Config::read_config()?;
    init_logging(&config)?;

    if let Err(e) = handle_command(matches, &config).await {
        eprintln!("{}", config.output_error.format(format!("{e:#}")));
        std::process::exit(1);
    }
    Ok(())
}
