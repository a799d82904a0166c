use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn series_status_arg() -> Arg {
    Arg::new("status")
        .long("status")
        .short('s')
        .help("Series status, e.g. \"Reading\" or \"Needs Investigation\"")
}

pub fn arg_parser() -> Command {
    Command::new("seriatim")
        .about("Keep track of book series and what to read next")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("export")
                .about("Write a backup of the whole library as JSON")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("File to write to instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Replace the whole library with the contents of a backup")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Only check that the backup can be imported"),
                ),
        )
        .subcommand(Command::new("reading").about("Show the book currently being read"))
        .subcommand(Command::new("next").about("Suggest the next book to read"))
        .subcommand(
            Command::new("list")
                .about("List series, least recently read first")
                .arg(series_status_arg().help("Only list series with this status, or \"Everything\"")),
        )
        .subcommand(
            Command::new("search")
                .about("Look up books of a series in the online catalog")
                .arg(Arg::new("series").required(true)),
        )
        .subcommand(
            Command::new("add")
                .about("Add a series or a book")
                .subcommand_required(true)
                .subcommand(
                    Command::new("series")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("author").long("author").short('a').required(true))
                        .arg(series_status_arg())
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("book")
                        .arg(Arg::new("series").required(true))
                        .arg(Arg::new("title").required(true))
                        .arg(
                            Arg::new("order")
                                .long("order")
                                .value_parser(value_parser!(i64))
                                .help("Position in the series, defaults to after the last book"),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .short('s')
                                .help("Read status, e.g. \"Completed\""),
                        )
                        .arg(Arg::new("author").long("author").short('a'))
                        .arg(Arg::new("start").long("start").help("Start date, YYYY-MM-DD"))
                        .arg(Arg::new("end").long("end").help("End date, YYYY-MM-DD"))
                        .arg(Arg::new("rating").long("rating").help("0 to 5"))
                        .arg(Arg::new("notes").long("notes")),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a series (with all its books) or a single book")
                .subcommand_required(true)
                .subcommand(Command::new("series").arg(Arg::new("name").required(true)))
                .subcommand(
                    Command::new("book")
                        .arg(Arg::new("series").required(true))
                        .arg(Arg::new("title").required(true)),
                ),
        )
        .subcommand(Command::new("goodreads").about("Export completed books as Goodreads CSV"))
        .subcommand(Command::new("config").about("Print the default configuration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_is_consistent() {
        arg_parser().debug_assert();
    }

    #[test]
    fn add_book() {
        let matches = arg_parser()
            .try_get_matches_from([
                "seriatim", "add", "book", "Culture", "Excession", "--order", "5", "--status",
                "completed",
            ])
            .unwrap();
        let (_, add) = matches.subcommand().unwrap();
        let (name, book) = add.subcommand().unwrap();
        assert_eq!(name, "book");
        assert_eq!(book.get_one::<i64>("order"), Some(&5));
        assert_eq!(book.get_one::<String>("title").map(String::as_str), Some("Excession"));
    }
}
