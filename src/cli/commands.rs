//! Command parsing
//!
//! Turns one REPL line into a `ParsedCommand`.

use crate::mesh::{IndexBox, Real};

/// Command parsing result
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    /// Load a dump: load <path>
    Load(String),
    /// Describe the loaded data: info
    Info,
    /// Min/max per grid: stats [comp]
    Stats(Option<usize>),
    /// Minimum of a component: min <comp> [<box>]
    Min { comp: usize, region: Option<IndexBox> },
    /// Maximum of a component: max <comp> [<box>]
    Max { comp: usize, region: Option<IndexBox> },
    /// Print values: print [grid]
    Print(Option<usize>),
    /// Print the grid boxes: boxes
    Boxes,
    /// Print the grids as a box domain: domain
    Domain,
    /// Print the boundary register around the grids: bndry
    Bndry,
    /// Tag cells above a threshold: tag <comp> <threshold>
    Tag { comp: usize, threshold: Real },
    /// List tagged cells: tags
    Tags,
    /// Count tagged cells: tagcount
    TagCount,
    /// Dump the loaded data: write <path>
    Write(String),
    /// Classify a number or raw bit pattern: class <value>
    Class(String),
    /// Help: ? or help
    Help,
    /// Quit: q or exit
    Quit,
    /// Unknown command
    Unknown(String),
}

/// Parse `<comp> [<box>]`
fn parse_scan_args(arg: Option<&str>) -> Option<(usize, Option<IndexBox>)> {
    let arg = arg?;
    let (comp, rest) = match arg.split_once(' ') {
        Some((comp, rest)) => (comp, Some(rest.trim())),
        None => (arg, None),
    };
    let comp = comp.parse().ok()?;
    match rest {
        Some(text) if !text.is_empty() => Some((comp, Some(text.parse().ok()?))),
        _ => Some((comp, None)),
    }
}

/// Parse a command string into a structured command
pub fn parse_command(input: &str) -> ParsedCommand {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts.first().unwrap_or(&"");
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match *cmd {
        "load" | "open" | "o" => match arg {
            Some(path) => ParsedCommand::Load(path.to_string()),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "info" | "i" => ParsedCommand::Info,

        "stats" | "st" => match arg {
            None => ParsedCommand::Stats(None),
            Some(comp) => match comp.parse() {
                Ok(comp) => ParsedCommand::Stats(Some(comp)),
                Err(_) => ParsedCommand::Unknown(input.to_string()),
            },
        },
        "min" | "max" => match parse_scan_args(arg) {
            Some((comp, region)) if *cmd == "min" => ParsedCommand::Min { comp, region },
            Some((comp, region)) => ParsedCommand::Max { comp, region },
            None => ParsedCommand::Unknown(input.to_string()),
        },

        "print" | "p" => match arg {
            None => ParsedCommand::Print(None),
            Some(grid) => match grid.parse() {
                Ok(grid) => ParsedCommand::Print(Some(grid)),
                Err(_) => ParsedCommand::Unknown(input.to_string()),
            },
        },
        "boxes" | "ba" => ParsedCommand::Boxes,
        "domain" | "bd" => ParsedCommand::Domain,
        "bndry" | "br" => ParsedCommand::Bndry,

        "tag" => {
            let fields: Vec<&str> = arg.map(|a| a.split_whitespace().collect()).unwrap_or_default();
            match fields.as_slice() {
                [comp, threshold] => match (comp.parse(), threshold.parse()) {
                    (Ok(comp), Ok(threshold)) => ParsedCommand::Tag { comp, threshold },
                    _ => ParsedCommand::Unknown(input.to_string()),
                },
                _ => ParsedCommand::Unknown(input.to_string()),
            }
        }
        "tags" => ParsedCommand::Tags,
        "tagcount" | "tc" => ParsedCommand::TagCount,

        "write" | "w" => match arg {
            Some(path) => ParsedCommand::Write(path.to_string()),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "class" | "fp" => match arg {
            Some(value) => ParsedCommand::Class(value.to_string()),
            None => ParsedCommand::Unknown(input.to_string()),
        },

        "?" | "help" => ParsedCommand::Help,
        "q" | "quit" | "exit" => ParsedCommand::Quit,

        _ => ParsedCommand::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::IntVect;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("  info "), ParsedCommand::Info);
        assert_eq!(parse_command("?"), ParsedCommand::Help);
        assert_eq!(parse_command("exit"), ParsedCommand::Quit);
        assert_eq!(parse_command("tc"), ParsedCommand::TagCount);
        assert_eq!(
            parse_command("load /tmp/a b.fab"),
            ParsedCommand::Load("/tmp/a b.fab".into())
        );
    }

    #[test]
    fn test_stats_and_print() {
        assert_eq!(parse_command("stats"), ParsedCommand::Stats(None));
        assert_eq!(parse_command("stats 2"), ParsedCommand::Stats(Some(2)));
        assert_eq!(parse_command("print 1"), ParsedCommand::Print(Some(1)));
        assert!(matches!(parse_command("stats x"), ParsedCommand::Unknown(_)));
    }

    #[test]
    fn test_min_max_with_region() {
        assert_eq!(
            parse_command("min 0"),
            ParsedCommand::Min {
                comp: 0,
                region: None
            }
        );
        assert_eq!(
            parse_command("max 1 ((0,0,0) (3,3,0) (0,0,0))"),
            ParsedCommand::Max {
                comp: 1,
                region: Some(IndexBox::new(IntVect::new(0, 0, 0), IntVect::new(3, 3, 0)))
            }
        );
        assert!(matches!(parse_command("max 1 ((0,0) (3,3))"), ParsedCommand::Unknown(_)));
        assert!(matches!(parse_command("min"), ParsedCommand::Unknown(_)));
    }

    #[test]
    fn test_tag() {
        assert_eq!(
            parse_command("tag 0 1.5e3"),
            ParsedCommand::Tag {
                comp: 0,
                threshold: 1500.0
            }
        );
        assert!(matches!(parse_command("tag 0"), ParsedCommand::Unknown(_)));
        assert!(matches!(parse_command("tag a b"), ParsedCommand::Unknown(_)));
    }

    #[test]
    fn test_missing_arguments() {
        assert!(matches!(parse_command("write"), ParsedCommand::Unknown(_)));
        assert!(matches!(parse_command("class"), ParsedCommand::Unknown(_)));
        assert_eq!(parse_command("fp nan"), ParsedCommand::Class("nan".into()));
        assert!(matches!(parse_command("frobnicate"), ParsedCommand::Unknown(_)));
    }
}
