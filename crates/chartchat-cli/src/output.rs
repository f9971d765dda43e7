use colored::Colorize;

pub fn print_error(message: &str) {
    eprintln!("{} {message}", "error:".red().bold());
}

pub fn print_success(message: &str) {
    println!("{} {message}", "ok:".green().bold());
}

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{pretty}"),
        Err(_) => println!("{value}"),
    }
}
