use stratagem::{
    Category, Item, ParameterRow, ParseOutcome, TriggerIndex, build_rows, build_trigger_index,
    detect_duplicate_strategies,
};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

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

pub fn print_run(outcome: &ParseOutcome, show_rows: bool, color: bool) {
    let palette = ansi::Palette::new(color);
    let doc = &outcome.document;
    let rows = build_rows(doc);
    let index = build_trigger_index(&rows);

    println!(
        "\n{}",
        palette.bold(palette.paint(
            format!("⚙  {} strategies in {} folders", doc.strategy_count(), doc.folders().count()),
            ansi::CYAN
        ))
    );

    println!("\n{}", palette.paint("━━━ Document ━━━", ansi::GRAY));
    print_document(outcome, &palette);

    println!("\n{}", palette.paint("━━━ Trigger keys ━━━", ansi::GRAY));
    print_triggers(&index, &palette);

    if show_rows {
        println!("\n{}", palette.paint("━━━ Rows ━━━", ansi::GRAY));
        print_rows(&rows, &palette);
    }

    println!("\n{}", palette.paint("━━━ Duplicates ━━━", ansi::GRAY));
    let duplicates = detect_duplicate_strategies(doc);
    if duplicates.is_empty() {
        println!("{}", palette.dim("  No duplicate strategies"));
    } else {
        for path in duplicates {
            let name = doc.strategy(path).map(|s| s.name.as_str()).unwrap_or("?");
            println!("  {} {}", palette.paint("dup", ansi::YELLOW), name);
        }
    }

    let progress = &outcome.metrics.progress;
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Lines: {}  │  Params: {}  │  Yields: {}",
        palette.paint(format!("{:?}", outcome.metrics.total), ansi::GREEN),
        palette.paint(progress.lines.to_string(), ansi::CYAN),
        palette.dim(progress.params.to_string()),
        palette.dim(progress.yields.to_string()),
    );
    println!();
}

fn print_document(outcome: &ParseOutcome, palette: &ansi::Palette) {
    if outcome.document.is_empty() {
        println!("{}", palette.dim("  No strategies found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Missing ##Begin_Strategy markers");
        println!("  • Parameters written outside any strategy block");
        println!("\n{}", palette.dim("  Tip: Set STRATAGEM_LOG=debug to trace the builder"));
        return;
    }

    for item in outcome.document.items() {
        match item {
            Item::Folder(folder) => {
                println!(
                    "  {} {}",
                    palette.paint(format!("[{}]", folder.name), ansi::BLUE),
                    palette.dim(format!("{} strategies", folder.strategies.len()))
                );
                for strategy in folder.strategies.iter().take(5) {
                    println!("    {} {}", strategy.name, palette.dim(format!("({} params)", strategy.params().len())));
                }
                if folder.strategies.len() > 5 {
                    println!("    {}", palette.dim(format!("... +{} more", folder.strategies.len() - 5)));
                }
            }
            Item::Strategy(strategy) => {
                println!("  {} {}", strategy.name, palette.dim(format!("({} params)", strategy.params().len())));
            }
        }
    }
}

fn print_triggers(index: &TriggerIndex, palette: &ansi::Palette) {
    if index.is_empty() {
        println!("{}", palette.dim("  No trigger keys referenced"));
        return;
    }

    let conflicts = index.conflicts();
    for (number, entry) in index.iter() {
        let launchers = entry.rows.iter().filter(|r| r.category == Category::Launch).count();
        let marker = if conflicts.contains(&number) { palette.paint("✗", ansi::YELLOW) } else { palette.dim("·") };
        println!(
            "  {} {} {} {}",
            marker,
            palette.bold(palette.paint(format!("#{number}"), ansi::GREEN)),
            palette.dim(format!("refs: {}", entry.count)),
            palette.dim(format!("launchers: {launchers}")),
        );
    }
    if let Some(free) = index.next_free(1) {
        println!("\n  {} {}", palette.dim("next free key:"), palette.paint(free.to_string(), ansi::CYAN));
    }
}

fn print_rows(rows: &[ParameterRow], palette: &ansi::Palette) {
    for row in rows {
        println!(
            "  {} {} {} {}={}",
            palette.paint(format!("{:<8}", row.category.as_str()), ansi::BLUE),
            palette.paint(&row.strategy, ansi::CYAN),
            palette.dim(row.folder.as_deref().unwrap_or("-")),
            row.param,
            palette.paint(&row.value, ansi::YELLOW),
        );
    }
}
