use eloquence::{Attempt, AttemptOutcome, ParseDetails, Response, ResponseKind};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print how one input was answered. `details` is `None` when the reply did
/// not come from the rule engine (repeat, blank input, no script).
pub fn print_turn(input: &str, response: &Response, details: Option<&ParseDetails>, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Input: \"{}\"", input), ansi::CYAN)));

    let Some(details) = details else {
        println!("\n{}", palette.paint("━━━ Reply ━━━", ansi::GRAY));
        print_reply(response, &palette);
        println!("  {}", palette.dim(skipped_reason(response.kind)));
        println!();
        return;
    };

    println!("\n{}", palette.paint("━━━ Keywords ━━━", ansi::GRAY));
    if details.ranked.is_empty() {
        println!("{}", palette.dim("  No keyword occurs in the input"));
    } else {
        for (idx, keyword) in details.ranked.iter().enumerate() {
            println!("  {} {}", palette.paint(format!("[{}]", idx), ansi::GRAY), palette.paint(keyword, ansi::BLUE));
        }
    }

    if !details.lines.is_empty() {
        println!("\n{}", palette.paint("━━━ Lines ━━━", ansi::GRAY));
        println!("  {} {}", palette.dim("searched:"), details.searched);
        for line in &details.lines {
            println!("  {} {}", palette.dim("•"), line);
        }
    }

    if !details.attempts.is_empty() {
        println!("\n{}", palette.paint("━━━ Attempts ━━━", ansi::GRAY));
        for attempt in &details.attempts {
            print_attempt(attempt, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Reply ━━━", ansi::GRAY));
    print_reply(response, &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Attempts: {}",
        palette.paint(format!("{:?}", details.elapsed), ansi::GREEN),
        palette.paint(details.attempts.len().to_string(), ansi::YELLOW),
    );
    println!();
}

fn print_attempt(attempt: &Attempt, palette: &ansi::Palette) {
    let outcome = match &attempt.outcome {
        AttemptOutcome::Accepted => palette.paint("✓ accepted", ansi::GREEN),
        AttemptOutcome::NoMatch => palette.dim("✗ no match"),
        AttemptOutcome::NoReplies => palette.paint("✗ no replies", ansi::YELLOW),
        AttemptOutcome::Incomplete { unresolved } => {
            palette.paint(format!("✗ {unresolved} unresolved"), ansi::RED)
        }
    };

    println!(
        "  {} {} {} {}",
        palette.paint(&attempt.keyword, ansi::BLUE),
        palette.paint(format!("#{}", attempt.decomposition), ansi::GRAY),
        palette.paint(&attempt.pattern, ansi::CYAN),
        outcome,
    );
    if let Some(regex) = &attempt.regex {
        println!("      {} {}", palette.dim("regex:"), palette.dim(regex));
    }
    if let Some(template) = &attempt.template {
        println!("      {} {}", palette.dim("template:"), template);
    }
    if !attempt.fragments.is_empty() {
        let fragments: Vec<String> = attempt.fragments.iter().map(|f| format!("\"{f}\"")).collect();
        println!("      {} {}", palette.dim("fragments:"), palette.paint(fragments.join(", "), ansi::YELLOW));
    }
}

fn print_reply(response: &Response, palette: &ansi::Palette) {
    println!(
        "  {} {} {}",
        palette.bold(palette.paint(&response.text, ansi::GREEN)),
        palette.dim("│"),
        palette.paint(format!("{:?}", response.kind), ansi::BLUE),
    );
}

fn skipped_reason(kind: ResponseKind) -> &'static str {
    match kind {
        ResponseKind::NotReady => "No script is loaded",
        ResponseKind::Repeated => "Input repeats a recent exchange",
        ResponseKind::Empty => "Input is blank",
        _ => "Rule engine was not consulted",
    }
}
