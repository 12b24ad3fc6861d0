//! An interactive phonebook.
//!
//! Commands are read line by line from stdin:
//!
//! ```text
//! set <name> <number>
//! get <name>
//! del <name>
//! ```
//!
//! By default the book lives in a fixed-size table keyed by the djb2 hash of the
//! name. With `--grow`, it uses a `HashMap` that grows as needed.

use std::io::{self, BufRead, Write};

use clap::Parser;
use rhmap::hash::{BuildDjb2, Djb2};
use rhmap::{HashMap, RawTable};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of entries in the fixed-size book
    #[arg(short, long, default_value_t = 10)]
    capacity: usize,

    /// Grow the book as needed instead of using a fixed size
    #[arg(long)]
    grow: bool,
}

struct Entry {
    name: String,
    number: i64,
}

enum Command<'a> {
    Set(&'a str, i64),
    Get(&'a str),
    Del(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Option<Command<'a>> {
        let mut words = line.split_whitespace();

        let command = match (words.next()?, words.next()?) {
            ("set", name) => Command::Set(name, words.next()?.parse().ok()?),
            ("get", name) => Command::Get(name),
            ("del", name) => Command::Del(name),
            _ => return None,
        };

        Some(command)
    }
}

// The storage behind the book.
trait Book {
    fn set(&mut self, name: &str, number: i64) -> &'static str;
    fn get(&self, name: &str) -> Option<&Entry>;
    fn del(&mut self, name: &str) -> Option<Entry>;
}

impl Book for RawTable<u64, Entry> {
    fn set(&mut self, name: &str, number: i64) -> &'static str {
        let hash = Djb2::hash_bytes(name.as_bytes());

        if let Some(entry) = self.search_mut(hash) {
            entry.number = number;
            return "Changed";
        }

        let entry = Entry {
            name: name.to_owned(),
            number,
        };

        match self.insert(hash, entry) {
            Ok(_) => "Inserted",
            Err(_) => "Failed",
        }
    }

    fn get(&self, name: &str) -> Option<&Entry> {
        self.search(Djb2::hash_bytes(name.as_bytes()))
    }

    fn del(&mut self, name: &str) -> Option<Entry> {
        self.remove(Djb2::hash_bytes(name.as_bytes()))
    }
}

impl Book for HashMap<String, Entry, BuildDjb2> {
    fn set(&mut self, name: &str, number: i64) -> &'static str {
        if let Some(entry) = self.get_mut(name) {
            entry.number = number;
            return "Changed";
        }

        let entry = Entry {
            name: name.to_owned(),
            number,
        };

        self.insert(name.to_owned(), entry);
        "Inserted"
    }

    fn get(&self, name: &str) -> Option<&Entry> {
        HashMap::get(self, name)
    }

    fn del(&mut self, name: &str) -> Option<Entry> {
        self.remove(name)
    }
}

fn run(book: &mut dyn Book) -> io::Result<()> {
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "Available commands:")?;
    writeln!(stdout, "set <name> <number>")?;
    writeln!(stdout, "get <name>")?;
    writeln!(stdout, "del <name>")?;

    for line in io::stdin().lock().lines() {
        let line = line?;

        match Command::parse(&line) {
            Some(Command::Set(name, number)) => writeln!(stdout, "{}", book.set(name, number))?,
            Some(Command::Get(name)) => match book.get(name) {
                Some(entry) => writeln!(stdout, "{}: {}", entry.name, entry.number)?,
                None => writeln!(stdout, "Not found")?,
            },
            Some(Command::Del(name)) => match book.del(name) {
                Some(_) => writeln!(stdout, "Deleted")?,
                None => writeln!(stdout, "Not found")?,
            },
            None => writeln!(stdout, "Unknown command")?,
        }
    }

    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if cli.grow {
        let mut book: HashMap<String, Entry, BuildDjb2> = HashMap::default();
        run(&mut book)
    } else {
        let mut book = RawTable::<u64, Entry>::with_capacity(cli.capacity.max(1));
        run(&mut book)?;

        // Hand the storage back; every remaining entry is dropped here.
        drop(book.into_storage());
        Ok(())
    }
}
