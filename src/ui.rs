/// User-facing status output
///
/// Documents and tables go to stdout; everything in this module goes to
/// stderr so piped output stays clean.
use std::io::Write;

/// Print colored text to stderr, with fallback to plain text
fn print_color(s: &str, fg: term::color::Color) {
    if !really_print_color(s, fg) {
        eprint!("{}", s);
    }

    fn really_print_color(s: &str, fg: term::color::Color) -> bool {
        let Some(mut t) = term::stderr() else {
            return false;
        };
        if t.fg(fg).is_err() {
            return false;
        }
        let _ = t.attr(term::Attr::Bold);
        if write!(t, "{}", s).is_err() {
            return false;
        }
        let _ = t.reset();
        true
    }
}

/// Print a status message with a "benchtab: " prefix
pub fn status(s: &str) {
    print_color("benchtab", term::color::BRIGHT_GREEN);
    eprintln!(": {}", s);
}

/// Print an error message with colored "error" prefix
pub fn print_error(msg: &str) {
    print_color("error", term::color::BRIGHT_RED);
    eprintln!(": {}", msg);
}
