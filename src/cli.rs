//! Interactive menu loop.
//!
//! Thin collaborator over [`Library`]: every menu entry maps 1:1 to one
//! aggregate operation and prints a short success or failure line. Business
//! logic stays in the aggregate.

use std::io::{self, BufRead, Write};

use crate::{
    error::AppResult,
    library::Library,
    models::{Book, User},
};

/// Run the menu loop until the user exits or stdin closes.
pub fn run(library: &mut Library) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print_menu();
        let Some(choice) = prompt(&mut input, "Enter your choice (1-9): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => add_book(library, &mut input)?,
            "2" => register_user(library, &mut input)?,
            "3" => borrow_book(library, &mut input)?,
            "4" => return_book(library, &mut input)?,
            "5" => search_books(library, &mut input)?,
            "6" => {
                for book in library.list_books(false) {
                    println!("{}", book);
                }
            }
            "7" => {
                for user in library.list_users() {
                    println!("{}", user);
                }
            }
            "8" => show_borrowed(library, &mut input)?,
            "9" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid option. Try again."),
        }
    }

    Ok(())
}

fn print_menu() {
    println!("\n--- Library Menu ---");
    println!("1. Add Book");
    println!("2. Register User");
    println!("3. Borrow Book");
    println!("4. Return Book");
    println!("5. Search Book");
    println!("6. Show All Books");
    println!("7. Show All Users");
    println!("8. Show User's Borrowed Books");
    println!("9. Exit");
}

/// Print the outcome of one aggregate operation. Persistence faults get a
/// louder line than ordinary rule violations; the catalog was rolled back
/// either way.
fn report(action: &str, result: AppResult<()>) {
    match result {
        Ok(()) => println!("{} succeeded.", action),
        Err(e) if e.is_business_failure() => println!("{} failed: {}", action, e),
        Err(e) => println!("{} failed, catalog unchanged: {}", action, e),
    }
}

/// Print a prompt and read one trimmed line. `None` on EOF.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn add_book(library: &mut Library, input: &mut impl BufRead) -> io::Result<()> {
    let Some(title) = prompt(input, "Enter book title: ")? else {
        return Ok(());
    };
    let Some(author) = prompt(input, "Enter author name: ")? else {
        return Ok(());
    };
    let Some(isbn) = prompt(input, "Enter ISBN: ")? else {
        return Ok(());
    };
    report("Add", library.add_book(Book::new(title, author, isbn)));
    Ok(())
}

fn register_user(library: &mut Library, input: &mut impl BufRead) -> io::Result<()> {
    let Some(name) = prompt(input, "Enter user name: ")? else {
        return Ok(());
    };
    let Some(user_id) = prompt(input, "Enter user ID: ")? else {
        return Ok(());
    };
    report("Registration", library.register_user(User::new(name, user_id)));
    Ok(())
}

fn borrow_book(library: &mut Library, input: &mut impl BufRead) -> io::Result<()> {
    let Some(user_id) = prompt(input, "Enter user ID: ")? else {
        return Ok(());
    };
    let Some(isbn) = prompt(input, "Enter ISBN to borrow: ")? else {
        return Ok(());
    };
    report("Borrow", library.borrow_book(&isbn, &user_id));
    Ok(())
}

fn return_book(library: &mut Library, input: &mut impl BufRead) -> io::Result<()> {
    let Some(user_id) = prompt(input, "Enter user ID: ")? else {
        return Ok(());
    };
    let Some(isbn) = prompt(input, "Enter ISBN to return: ")? else {
        return Ok(());
    };
    report("Return", library.return_book(&isbn, &user_id));
    Ok(())
}

fn search_books(library: &Library, input: &mut impl BufRead) -> io::Result<()> {
    let Some(query) = prompt(input, "Search title/author/ISBN: ")? else {
        return Ok(());
    };
    let matches = library.search_books(&query);
    if matches.is_empty() {
        println!("No matching books.");
    }
    for book in matches {
        println!("{}", book);
    }
    Ok(())
}

fn show_borrowed(library: &Library, input: &mut impl BufRead) -> io::Result<()> {
    let Some(user_id) = prompt(input, "Enter user ID: ")? else {
        return Ok(());
    };
    match library.borrowed_books_of(&user_id) {
        Ok(books) => {
            for book in books {
                println!("{}", book);
            }
        }
        Err(_) => println!("User not found."),
    }
    Ok(())
}
