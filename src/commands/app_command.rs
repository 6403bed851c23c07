use crate::village::fixture::MAX_COUNT;
use crate::village::VillageId;
use std::str::FromStr;

pub const USAGE: &str = "search <text> | filter <all|mandiri|maju|berkembang|tertinggal> | sort <name|district|status|score|DLD|DS|DE|DL|DA|DTKPD> | page <n> | expand <id> | reload | seed [count] [seed] | import <path.json> | clear | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // applied to the browser in the UI thread
    Search { text: String },
    Filter { status: String },
    Sort { key: String },
    Page { n: i64 },
    Expand { id: VillageId },
    // handled by the loader task
    Reload,
    Seed {
        count: Option<usize>,
        seed: Option<u64>,
    },
    Import { path: String },
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl AppCommand {
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppCommand::Search { .. }
                | AppCommand::Filter { .. }
                | AppCommand::Sort { .. }
                | AppCommand::Page { .. }
                | AppCommand::Expand { .. }
        )
    }
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        match parts[0] {
            "search" | "cari" => {
                // keep inner spacing of multi-word names
                let text = s.trim_start()[parts[0].len()..].trim().to_string();
                Ok(AppCommand::Search { text })
            }
            "filter" => match parts.get(1) {
                Some(status) => Ok(AppCommand::Filter {
                    status: status.to_string(),
                }),
                None => Ok(AppCommand::Filter {
                    status: "ALL".to_string(),
                }),
            },
            "sort" => match parts.get(1) {
                Some(key) => Ok(AppCommand::Sort {
                    key: key.to_string(),
                }),
                None => Ok(AppCommand::Unknown("usage: sort <column>".to_string())),
            },
            "page" => match parts.get(1).and_then(|s| s.parse::<i64>().ok()) {
                Some(n) => Ok(AppCommand::Page { n }),
                None => Ok(AppCommand::Unknown("usage: page <n>".to_string())),
            },
            "expand" => match parts.get(1).and_then(|s| s.parse::<VillageId>().ok()) {
                Some(id) => Ok(AppCommand::Expand { id }),
                None => Ok(AppCommand::Unknown("usage: expand <id>".to_string())),
            },
            "reload" | "refresh" => Ok(AppCommand::Reload),
            "seed" => {
                let count = parts
                    .get(1)
                    .and_then(|s| s.parse::<usize>().ok())
                    .filter(|n| *n <= MAX_COUNT);
                let seed = parts.get(2).and_then(|s| s.parse::<u64>().ok());
                if parts.len() > 1 && count.is_none() || parts.len() > 2 && seed.is_none() {
                    return Ok(AppCommand::Unknown(format!(
                        "usage: seed [count <= {}] [seed]",
                        MAX_COUNT
                    )));
                }
                Ok(AppCommand::Seed { count, seed })
            }
            "import" => {
                let path = s.trim_start()[parts[0].len()..].trim().to_string();
                if path.is_empty() {
                    Ok(AppCommand::Unknown("usage: import <path.json>".to_string()))
                } else {
                    Ok(AppCommand::Import { path })
                }
            }
            "clear" => Ok(AppCommand::Clear),
            "help" | "h" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Quit),
            _ => Ok(AppCommand::Unknown(format!("unknown command: {}", parts[0]))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> AppCommand {
        s.parse().unwrap()
    }

    #[test]
    fn search_keeps_multi_word_text() {
        assert_eq!(
            parse("search  labuhan ratu "),
            AppCommand::Search {
                text: "labuhan ratu".to_string()
            }
        );
        assert_eq!(
            parse("search"),
            AppCommand::Search {
                text: String::new()
            }
        );
    }

    #[test]
    fn local_commands_are_flagged() {
        assert!(parse("filter maju").is_local());
        assert!(parse("sort DLD").is_local());
        assert!(parse("page 3").is_local());
        assert!(parse("expand 12").is_local());
        assert!(!parse("reload").is_local());
        assert!(!parse("seed 10 3").is_local());
    }

    #[test]
    fn filter_without_argument_means_all() {
        assert_eq!(
            parse("filter"),
            AppCommand::Filter {
                status: "ALL".to_string()
            }
        );
    }

    #[test]
    fn seed_arguments_are_optional_but_validated() {
        assert_eq!(
            parse("seed"),
            AppCommand::Seed {
                count: None,
                seed: None
            }
        );
        assert_eq!(
            parse("seed 50 7"),
            AppCommand::Seed {
                count: Some(50),
                seed: Some(7)
            }
        );
        assert!(matches!(parse("seed lots"), AppCommand::Unknown(_)));
    }

    #[test]
    fn seed_count_above_the_cap_is_rejected() {
        assert!(matches!(
            parse("seed 18446744073709551615"),
            AppCommand::Unknown(msg) if msg.starts_with("usage: seed")
        ));
        assert!(matches!(parse("seed 10001 3"), AppCommand::Unknown(_)));
        assert_eq!(
            parse("seed 10000"),
            AppCommand::Seed {
                count: Some(10_000),
                seed: None
            }
        );
    }

    #[test]
    fn bad_arguments_become_usage_messages() {
        assert!(matches!(parse("page x"), AppCommand::Unknown(_)));
        assert!(matches!(parse("expand"), AppCommand::Unknown(_)));
        assert!(matches!(parse("import"), AppCommand::Unknown(_)));
        assert!(matches!(parse("launch"), AppCommand::Unknown(_)));
        assert_eq!(
            parse("import data/desa.json"),
            AppCommand::Import {
                path: "data/desa.json".to_string()
            }
        );
    }

    #[test]
    fn import_path_keeps_inner_spacing() {
        assert_eq!(
            parse("import  data/desa  lampung.json "),
            AppCommand::Import {
                path: "data/desa  lampung.json".to_string()
            }
        );
    }
}
