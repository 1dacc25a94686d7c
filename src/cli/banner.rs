//! ASCII art banner for interactive mode.

use std::io::IsTerminal;

/// ANSI true-color escape sequences for the banner palette.
struct Colors {
    crosshair: &'static str,
    ring: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    crosshair: "\x1b[1;38;2;220;60;60m",
    ring: "\x1b[38;2;120;170;200m",
    title: "\x1b[1;38;2;180;210;230m",
    subtitle: "\x1b[38;2;100;100;120m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    crosshair: "",
    ring: "",
    title: "",
    subtitle: "",
    reset: "",
};

/// Prints the snipelord banner to stdout.
///
/// Renders ANSI true-color when stdout is a terminal, falls back to plain text otherwise.
pub fn print_banner() {
    let c = if std::io::stdout().is_terminal() {
        &COLOR
    } else {
        &PLAIN
    };

    let cr = c.crosshair;
    let rg = c.ring;
    let tt = c.title;
    let st = c.subtitle;
    let r = c.reset;

    println!(
        r#"
{rg}      .---.{r}          {tt}            _             __           __{r}
{rg}     / {cr}+{rg} \{r}         {tt} __________  (_)___  ___  / /___  _________/ /{r}
{rg}    | {cr}-+-{rg} |{r}        {tt}/ ___/ __ \/ / __ \/ _ \/ / __ \/ ___/ __  / {r}
{rg}     \ {cr}+{rg} /{r}        {tt}(__  ) /_/ / / /_/ /  __/ / /_/ / /  / /_/ /{r}
{rg}      '---'{r}        {tt}/____/ .___/_/ .___/\___/_/\____/_/   \__,_/{r}
{st}                    /_/   /_/{r}
"#
    );
}
