//! Listing extraction from a parsed job board page.
//!
//! The default lookups mirror the board's fixed layout: matched headings sit
//! three levels below their card and the detail link is the card's second
//! anchor. Both positional rules can be swapped for selectors through
//! [`ExtractConfig`], which is sturdier when the markup shifts.

use joblist_config::{ExtractConfig, MatchMode};
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// One job posting as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub organization: String,
    pub location: String,
    pub detail_link: String,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid {field} selector `{selector}`: {message}")]
    Selector {
        field: &'static str,
        selector: String,
        message: String,
    },
    #[error("invalid keyword pattern: {0}")]
    Keyword(#[from] regex::Error),
    #[error("no element with id `{0}` in page")]
    ContainerNotFound(String),
    #[error("heading `{heading}` has no element {depth} levels up")]
    NoAncestor { heading: String, depth: usize },
    #[error("heading `{heading}` has no ancestor matching `{selector}`")]
    NoCard { heading: String, selector: String },
    #[error("listing `{heading}` has no {field} matching `{selector}`")]
    MissingField {
        heading: String,
        field: &'static str,
        selector: String,
    },
    #[error("listing `{heading}` has {found} anchors, wanted index {index}")]
    MissingAnchor {
        heading: String,
        index: usize,
        found: usize,
    },
    #[error("listing `{heading}` has no link matching `{selector}`")]
    MissingLink { heading: String, selector: String },
    #[error("listing `{heading}` link has no href")]
    MissingHref { heading: String },
}

enum Matcher {
    Substring(String),
    WholeWord(Regex),
}

impl Matcher {
    fn new(keyword: &str, mode: MatchMode) -> Result<Self, ExtractError> {
        Ok(match mode {
            MatchMode::Substring => Self::Substring(keyword.to_lowercase()),
            MatchMode::WholeWord => Self::WholeWord(
                RegexBuilder::new(&format!(r"(?:^|\W){}(?:\W|$)", regex::escape(keyword)))
                    .case_insensitive(true)
                    .build()?,
            ),
        })
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
            Self::WholeWord(re) => re.is_match(text),
        }
    }
}

enum CardLookup {
    Depth(usize),
    Closest { selector: Selector, raw: String },
}

enum LinkLookup {
    Index(usize),
    First { selector: Selector, raw: String },
}

/// A matched heading together with the card it was resolved to.
#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    pub heading: ElementRef<'a>,
    pub element: ElementRef<'a>,
}

struct FieldSelector {
    name: &'static str,
    raw: String,
    selector: Selector,
}

impl FieldSelector {
    fn compile(name: &'static str, raw: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            name,
            raw: raw.to_string(),
            selector: compile(name, raw)?,
        })
    }
}

fn compile(field: &'static str, raw: &str) -> Result<Selector, ExtractError> {
    Selector::parse(raw).map_err(|e| ExtractError::Selector {
        field,
        selector: raw.to_string(),
        message: e.to_string(),
    })
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Compiled form of [`ExtractConfig`].
pub struct Extractor {
    container_id: String,
    with_id: Selector,
    heading: FieldSelector,
    matcher: Matcher,
    card: CardLookup,
    title: FieldSelector,
    organization: FieldSelector,
    location: FieldSelector,
    anchor: Selector,
    link: LinkLookup,
}

impl Extractor {
    pub fn from_config(cfg: &ExtractConfig) -> Result<Self, ExtractError> {
        let card = match &cfg.card_selector {
            Some(raw) => CardLookup::Closest {
                selector: compile("card", raw)?,
                raw: raw.clone(),
            },
            None => CardLookup::Depth(cfg.ancestor_depth),
        };
        let link = match &cfg.link_selector {
            Some(raw) => LinkLookup::First {
                selector: compile("link", raw)?,
                raw: raw.clone(),
            },
            None => LinkLookup::Index(cfg.link_index),
        };

        Ok(Self {
            container_id: cfg.container_id.clone(),
            with_id: compile("container", "[id]")?,
            heading: FieldSelector::compile("heading", &cfg.heading_selector)?,
            matcher: Matcher::new(&cfg.keyword, cfg.match_mode)?,
            card,
            title: FieldSelector::compile("title", &cfg.title_selector)?,
            organization: FieldSelector::compile("organization", &cfg.organization_selector)?,
            location: FieldSelector::compile("location", &cfg.location_selector)?,
            anchor: compile("anchor", "a")?,
            link,
        })
    }

    #[cfg(test)]
    fn extract(&self, html: &str) -> Result<Vec<Listing>, ExtractError> {
        let document = Html::parse_document(html);
        self.cards(&document)?
            .into_iter()
            .map(|card| self.build_listing(card))
            .collect()
    }

    /// Resolve the card of every heading whose text matches the keyword, in
    /// document order. Fails if the container is absent or any card cannot be
    /// reached.
    pub fn cards<'a>(&self, document: &'a Html) -> Result<Vec<Card<'a>>, ExtractError> {
        let container = document
            .select(&self.with_id)
            .find(|el| el.value().id() == Some(self.container_id.as_str()))
            .ok_or_else(|| ExtractError::ContainerNotFound(self.container_id.clone()))?;

        let headings: Vec<ElementRef<'a>> = container
            .select(&self.heading.selector)
            .filter(|h| self.matcher.matches(&h.text().collect::<String>()))
            .collect();

        tracing::debug!(
            target: "web.extract",
            container = %self.container_id,
            heading = %self.heading.raw,
            matches = headings.len(),
            "extract.headings_matched"
        );

        headings
            .into_iter()
            .map(|heading| {
                Ok(Card {
                    heading,
                    element: self.card_of(heading)?,
                })
            })
            .collect()
    }

    fn card_of<'a>(&self, heading: ElementRef<'a>) -> Result<ElementRef<'a>, ExtractError> {
        match &self.card {
            CardLookup::Depth(0) => Ok(heading),
            CardLookup::Depth(depth) => heading
                .ancestors()
                .nth(depth - 1)
                .and_then(ElementRef::wrap)
                .ok_or_else(|| ExtractError::NoAncestor {
                    heading: text_of(heading),
                    depth: *depth,
                }),
            CardLookup::Closest { selector, raw } => heading
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| selector.matches(el))
                .ok_or_else(|| ExtractError::NoCard {
                    heading: text_of(heading),
                    selector: raw.clone(),
                }),
        }
    }

    /// Read the four fields out of a resolved card.
    pub fn build_listing(&self, card: Card<'_>) -> Result<Listing, ExtractError> {
        Ok(Listing {
            title: self.field(&card, &self.title)?,
            organization: self.field(&card, &self.organization)?,
            location: self.field(&card, &self.location)?,
            detail_link: self.detail_link(&card)?,
        })
    }

    fn field(&self, card: &Card<'_>, field: &FieldSelector) -> Result<String, ExtractError> {
        card.element
            .select(&field.selector)
            .next()
            .map(text_of)
            .ok_or_else(|| ExtractError::MissingField {
                heading: text_of(card.heading),
                field: field.name,
                selector: field.raw.clone(),
            })
    }

    fn detail_link(&self, card: &Card<'_>) -> Result<String, ExtractError> {
        let link = match &self.link {
            LinkLookup::Index(index) => {
                let anchors: Vec<ElementRef<'_>> = card.element.select(&self.anchor).collect();
                *anchors
                    .get(*index)
                    .ok_or_else(|| ExtractError::MissingAnchor {
                        heading: text_of(card.heading),
                        index: *index,
                        found: anchors.len(),
                    })?
            }
            LinkLookup::First { selector, raw } => card
                .element
                .select(selector)
                .next()
                .ok_or_else(|| ExtractError::MissingLink {
                    heading: text_of(card.heading),
                    selector: raw.clone(),
                })?,
        };

        link.value()
            .attr("href")
            .map(|href| href.trim().to_string())
            .ok_or_else(|| ExtractError::MissingHref {
                heading: text_of(card.heading),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, company: &str, location: &str, link: &str) -> String {
        format!(
            r#"<div class="column is-half">
  <div class="card">
    <div class="card-content">
      <div class="media">
        <div class="media-content">
          <h2 class="title is-5">{title}</h2>
          <h3 class="subtitle is-6 company">{company}</h3>
        </div>
      </div>
      <div class="content">
        <p class="location">
          {location}
        </p>
      </div>
      <footer class="card-footer">
        <a href="https://www.realpython.com" class="card-footer-item">Learn</a>
        <a href="{link}" class="card-footer-item">Apply</a>
      </footer>
    </div>
  </div>
</div>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!(
            r#"<html><body><h2>Python news outside the board</h2><div id="ResultsContainer">{}</div></body></html>"#,
            cards.join("\n")
        )
    }

    fn default_extractor() -> Extractor {
        Extractor::from_config(&ExtractConfig::default()).unwrap()
    }

    #[test]
    fn extracts_trimmed_fields_of_matching_card() {
        let html = page(&[
            card(
                "Senior Python Developer",
                "Payne, Roberts and Davis",
                "Stewartbury, AA",
                "  https://example.org/jobs/senior-python-developer-0.html \n",
            ),
            card("Energy engineer", "Vasquez-Davidson", "Christopherville, AA", "x"),
        ]);

        let listings = default_extractor().extract(&html).unwrap();

        assert_eq!(
            listings,
            vec![Listing {
                title: "Senior Python Developer".into(),
                organization: "Payne, Roberts and Davis".into(),
                location: "Stewartbury, AA".into(),
                detail_link: "https://example.org/jobs/senior-python-developer-0.html".into(),
            }]
        );
    }

    #[test]
    fn headings_outside_container_are_ignored() {
        let html = page(&[card("Energy engineer", "V", "C", "x")]);
        assert!(default_extractor().extract(&html).unwrap().is_empty());
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let html = page(&[
            card("PYTHON Developer", "A", "L", "a"),
            card("Pythonic Design", "B", "L", "b"),
            card("CPython core dev", "C", "L", "c"),
            card("Java Developer", "D", "L", "d"),
        ]);
        let titles: Vec<String> = default_extractor()
            .extract(&html)
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(
            titles,
            vec!["PYTHON Developer", "Pythonic Design", "CPython core dev"]
        );
    }

    #[test]
    fn whole_word_mode_is_opt_in() {
        let cfg = ExtractConfig {
            match_mode: MatchMode::WholeWord,
            ..ExtractConfig::default()
        };
        let html = page(&[
            card("Python Developer", "A", "L", "a"),
            card("Pythonic Design", "B", "L", "b"),
        ]);
        let listings = Extractor::from_config(&cfg).unwrap().extract(&html).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Python Developer");
    }

    #[test]
    fn whole_word_mode_handles_punctuated_keywords() {
        let cpp = ExtractConfig {
            keyword: "c++".into(),
            match_mode: MatchMode::WholeWord,
            ..ExtractConfig::default()
        };
        let html = page(&[
            card("Senior C++ Developer", "A", "L", "a"),
            card("C++x Tooling", "B", "L", "b"),
        ]);
        let listings = Extractor::from_config(&cpp).unwrap().extract(&html).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Senior C++ Developer");

        let dotnet = ExtractConfig {
            keyword: ".net".into(),
            ..cpp
        };
        let html = page(&[card(".NET Engineer", "C", "L", "c")]);
        let listings = Extractor::from_config(&dotnet).unwrap().extract(&html).unwrap();
        assert_eq!(listings.len(), 1);
    }

    #[test]
    fn missing_container_fails() {
        let html = "<html><body><div id=\"Other\"><h2>Python</h2></div></body></html>";
        let err = default_extractor().extract(html).unwrap_err();
        assert!(matches!(err, ExtractError::ContainerNotFound(id) if id == "ResultsContainer"));
    }

    #[test]
    fn single_anchor_is_an_index_fault() {
        let html = page(&[card("Python Dev", "A", "L", "a")
            .replace(r#"<a href="https://www.realpython.com" class="card-footer-item">Learn</a>"#, "")]);
        let err = default_extractor().extract(&html).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingAnchor { index: 1, found: 1, .. }
        ));
    }

    #[test]
    fn missing_field_is_an_error() {
        let html = page(&[card("Python Dev", "A", "L", "a").replace("location", "place")]);
        let err = default_extractor().extract(&html).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingField { field: "location", .. }
        ));
    }

    #[test]
    fn anchor_without_href_is_an_error() {
        let html = page(&[card("Python Dev", "A", "L", "a").replace(r#"href="a""#, "")]);
        let err = default_extractor().extract(&html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingHref { .. }));
    }

    #[test]
    fn shallow_tree_is_an_ancestor_fault() {
        let cfg = ExtractConfig {
            ancestor_depth: 50,
            ..ExtractConfig::default()
        };
        let html = page(&[card("Python Dev", "A", "L", "a")]);
        let err = Extractor::from_config(&cfg).unwrap().extract(&html).unwrap_err();
        assert!(matches!(err, ExtractError::NoAncestor { depth: 50, .. }));
    }

    #[test]
    fn wrong_depth_reads_fields_from_the_wrong_element() {
        // Two levels up is `div.media`, which has no location.
        let cfg = ExtractConfig {
            ancestor_depth: 2,
            ..ExtractConfig::default()
        };
        let html = page(&[card("Python Dev", "A", "L", "a")]);
        let err = Extractor::from_config(&cfg).unwrap().extract(&html).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingField { field: "location", .. }
        ));
    }

    #[test]
    fn selector_lookups_replace_positions() {
        let cfg = ExtractConfig {
            card_selector: Some("div.card".into()),
            link_selector: Some("footer a:last-child".into()),
            ..ExtractConfig::default()
        };
        // Extra wrapper shifts the heading one level deeper than the default depth expects.
        let html = page(&[card("Python Dev", "A", "L", "https://example.org/d")
            .replace(
                r#"<h2 class="title is-5">Python Dev</h2>"#,
                r#"<div class="wrap"><h2 class="title is-5">Python Dev</h2></div>"#,
            )]);

        let listings = Extractor::from_config(&cfg).unwrap().extract(&html).unwrap();
        assert_eq!(listings[0].detail_link, "https://example.org/d");
        assert_eq!(listings[0].location, "L");
    }

    #[test]
    fn invalid_selector_is_reported_with_field() {
        let cfg = ExtractConfig {
            title_selector: "h2..title".into(),
            ..ExtractConfig::default()
        };
        let err = Extractor::from_config(&cfg).err().expect("selector must fail");
        assert!(matches!(err, ExtractError::Selector { field: "title", .. }));
    }
}
