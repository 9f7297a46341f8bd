use crossterm::style::Stylize;

pub fn info(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().blue());
}

pub fn notice(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().yellow());
}

pub fn success(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().green());
}

pub fn error(msg: impl AsRef<str>) {
    eprintln!("{}", msg.as_ref().red());
}

pub fn banner() {
    let title = " SSH Config Sync ";
    let rule = "─".repeat(title.chars().count());
    println!("{}", format!("┌{rule}┐").blue());
    println!("{}{}{}", "│".blue(), title.bold().blue(), "│".blue());
    println!("{}", format!("└{rule}┘").blue());
    println!("\nKeep SSH hosts and security group rules in step with your EC2 instances.\n");
}
