//! Line-driven deck session on stdin

use anyhow::Result;
use foodigram_core::{Allergen, Catalog, Category};
use foodigram_deck::{Deck, FilterCriteria, HistorySync, InteractionStore, TransitionIntent};
use foodigram_storage::FileStore;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Prev,
    Like,
    Scrap,
    Search(String),
    ClearSearch,
    Category(Category),
    AllCategories,
    NoCategories,
    Avoid(Allergen),
    ClearAvoid,
    LikedOnly,
    Friends,
    History,
    Show,
    Help,
    Quit,
}

fn parse(line: &str) -> std::result::Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_lowercase().as_str() {
        "" | "show" => Input::Show,
        "n" | "next" => Input::Next,
        "p" | "prev" => Input::Prev,
        "l" | "like" => Input::Like,
        "s" | "scrap" => Input::Scrap,
        "/" | "search" if rest.is_empty() => Input::ClearSearch,
        "/" | "search" => Input::Search(rest.to_string()),
        "c" | "cat" => match rest {
            "all" => Input::AllCategories,
            "none" => Input::NoCategories,
            label => Input::Category(label.parse().map_err(|e| format!("{e}"))?),
        },
        "a" | "avoid" if rest.is_empty() || rest == "none" => Input::ClearAvoid,
        "a" | "avoid" => Input::Avoid(rest.parse().map_err(|e| format!("{e}"))?),
        "liked" => Input::LikedOnly,
        "f" | "friends" => Input::Friends,
        "h" | "history" => Input::History,
        "?" | "help" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => return Err(format!("Unknown command: {other} (try `help`)")),
    };
    Ok(input)
}

const HELP: &str = "\
  n, next          next card
  p, prev          previous card
  l, like          like / unlike the current card
  s, scrap         scrap / unscrap the current card
  / TEXT           search (empty clears)
  c LABEL          toggle a category; `c all`, `c none`
  a LABEL          toggle an avoided allergen; `a none` clears
  liked            only liked cards on / off
  f, friends       friends with items in common
  h, history       scrapped items
  q, quit          leave";

/// Run the deck until `quit` or end of input
pub fn run(
    catalog: Catalog,
    store: InteractionStore,
    criteria: FilterCriteria,
    mut history: HistorySync<FileStore>,
) -> Result<()> {
    let mut deck = Deck::with_interactions(catalog, store);
    deck.set_criteria(criteria);
    deck.transition();

    println!("\n  FOODIGRAM DECK");
    println!("  ==============\n");
    println!("{HELP}\n");
    render(&deck, TransitionIntent::None);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = match parse(&line?) {
            Ok(input) => input,
            Err(message) => {
                println!("  {message}");
                continue;
            }
        };

        let intent = match input {
            Input::Quit => break,
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Friends => {
                print_friends(&deck);
                continue;
            }
            Input::History => {
                print_history(deck.interactions());
                continue;
            }
            Input::Show => TransitionIntent::None,
            Input::Next => deck.next(),
            Input::Prev => deck.prev(),
            Input::Like => {
                match deck.like_current() {
                    Some(true) => println!("  Liked."),
                    Some(false) => println!("  Unliked."),
                    None => println!("  Nothing to like."),
                }
                deck.last_transition()
            }
            Input::Scrap => {
                match deck.scrap_current() {
                    Some(scrapped) => {
                        println!("  {}", if scrapped { "Scrapped." } else { "Unscrapped." });
                        if let Err(e) = history.persist(deck.interactions()) {
                            warn!(error = %e, "could not save scrapped history");
                            println!("  (could not save history: {e})");
                        }
                    }
                    None => println!("  Nothing to scrap."),
                }
                deck.last_transition()
            }
            Input::Search(text) => deck.submit_search(text),
            Input::ClearSearch => deck.clear_search(),
            Input::Category(category) => deck.toggle_category(category),
            Input::AllCategories => deck.select_all_categories(),
            Input::NoCategories => deck.clear_categories(),
            Input::Avoid(allergen) => deck.toggle_allergen(allergen),
            Input::ClearAvoid => deck.clear_allergens(),
            Input::LikedOnly => deck.toggle_liked_only(),
        };

        render(&deck, intent);
    }

    println!();
    Ok(())
}

fn render(deck: &Deck, intent: TransitionIntent) {
    let arrow = match intent {
        TransitionIntent::Forward => "<-",
        TransitionIntent::Backward => "->",
        TransitionIntent::Replace => "^^",
        TransitionIntent::None => "  ",
    };

    match (deck.position().index(), deck.current()) {
        (Some(index), Some(item)) => {
            let store = deck.interactions();
            let mut marks = String::new();
            if store.is_liked(item.id) {
                marks.push_str(" [liked]");
            }
            if store.is_scrapped(item.id) {
                marks.push_str(" [scrapped]");
            }
            println!(
                "  {arrow} {}/{}  {}{marks}",
                index + 1,
                deck.view().len(),
                item.render_compact()
            );
        }
        _ => {
            let hint = if deck.criteria().liked_only {
                " (liked only is on)"
            } else {
                ""
            };
            println!("  {arrow} no results{hint}");
        }
    }
}

fn print_friends(deck: &Deck) {
    let overlaps = deck.friends_overlap();
    if overlaps.is_empty() {
        println!("  (no friends in this catalog)");
    }
    for overlap in overlaps {
        if overlap.is_empty() {
            println!("  {}: nothing in common yet", overlap.friend.name);
        } else {
            println!("  {}: {}", overlap.friend.name, overlap.item_names.join(", "));
        }
    }
}

fn print_history(store: &InteractionStore) {
    if store.scrapped_entries().is_empty() {
        println!("  (nothing scrapped yet)");
    }
    for entry in store.scrapped_history() {
        println!("  {}", entry.item.render_compact());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(parse("n"), Ok(Input::Next));
        assert_eq!(parse("  PREV "), Ok(Input::Prev));
        assert_eq!(parse(""), Ok(Input::Show));
        assert_eq!(parse("q"), Ok(Input::Quit));
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(parse("/ spicy noodle"), Ok(Input::Search("spicy noodle".to_string())));
        assert_eq!(parse("search"), Ok(Input::ClearSearch));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(parse("c korean"), Ok(Input::Category(Category::Korean)));
        assert_eq!(parse("c snack food"), Ok(Input::Category(Category::SnackFood)));
        assert_eq!(parse("c all"), Ok(Input::AllCategories));
        assert_eq!(parse("a tree nuts"), Ok(Input::Avoid(Allergen::TreeNuts)));
        assert_eq!(parse("a"), Ok(Input::ClearAvoid));
        assert!(parse("c sushi-bar").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        assert!(parse("dance").is_err());
    }
}
