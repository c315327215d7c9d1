use nu_ansi_term::Color::{Blue, Cyan, Green, Red, Yellow};

/// Print a step heading on console.
pub fn step(message: &str) {
    println!("{}", Blue.bold().paint(format!("==> {message}")));
}

/// Print info on console.
pub fn info(message: &str) {
    println!("{}", Cyan.bold().italic().paint(message));
}

/// Print a success message on console.
pub fn success(message: &str) {
    println!("{}", Green.bold().paint(message));
}

/// Print warning on console, followed by the data it refers to.
pub fn warn(message: &str, data: &str) {
    println!(
        "{} \n {} ",
        Yellow.bold().italic().paint(message),
        Red.bold().italic().paint(data)
    );
}

/// Print an error on the console's error stream.
pub fn error(message: &str) {
    eprintln!("{}", Red.bold().paint(message));
}

/// Print a command the user may run next.
pub fn hint(description: &str, command: &str) {
    println!("  {description}:\n    {}", Cyan.paint(command));
}
