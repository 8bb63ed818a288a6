//! Locating verbatim excerpts in page text.

use super::types::Citation;

/// Excerpts longer than this get a second, prefix-only probe.
const PREFIX_PROBE_MIN_CHARS: usize = 40;
const PREFIX_PROBE_CHARS: usize = 80;

/// Find the 1-indexed page containing `excerpt`.
///
/// The trimmed excerpt is searched for as an exact substring, first page
/// first. Long excerpts that miss are retried with their first 80 chars,
/// which tolerates a model paraphrasing the tail of a quote.
pub fn find_page(excerpt: &str, pages: &[String]) -> Option<u32> {
    let needle = excerpt.trim();
    if needle.is_empty() {
        return None;
    }

    if let Some(page) = first_page_containing(needle, pages) {
        return Some(page);
    }

    if needle.chars().count() > PREFIX_PROBE_MIN_CHARS {
        let probe: String = needle.chars().take(PREFIX_PROBE_CHARS).collect();
        return first_page_containing(&probe, pages);
    }

    None
}

fn first_page_containing(needle: &str, pages: &[String]) -> Option<u32> {
    pages
        .iter()
        .position(|page| page.contains(needle))
        .map(|idx| idx as u32 + 1)
}

/// Resolve excerpts to citations, dropping blank ones.
pub fn match_citations<I, S>(excerpts: I, pages: &[String]) -> Vec<Citation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    excerpts
        .into_iter()
        .filter_map(|excerpt| {
            let excerpt = excerpt.as_ref().trim();
            if excerpt.is_empty() {
                return None;
            }
            Some(Citation {
                excerpt: excerpt.to_string(),
                page: find_page(excerpt, pages),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<String> {
        vec![
            "Cover page. Annual report for the fiscal year ended December 31.".to_string(),
            "Revenue increased 12% to $4.2 billion driven by subscription growth in every region we serve.".to_string(),
            "Revenue increased 12% appears again here.".to_string(),
        ]
    }

    #[test]
    fn test_exact_match_first_page_wins() {
        assert_eq!(find_page("Revenue increased 12%", &pages()), Some(2));
        assert_eq!(find_page("  fiscal year ended  ", &pages()), Some(1));
    }

    #[test]
    fn test_unmatched_is_none() {
        assert_eq!(find_page("Net loss widened", &pages()), None);
        assert_eq!(find_page("   ", &pages()), None);
        assert_eq!(find_page("anything", &[]), None);
    }

    #[test]
    fn test_long_excerpt_prefix_probe() {
        let excerpt = "Revenue increased 12% to $4.2 billion driven by subscription growth in every \
                       region we serve, with paraphrased trailing words that are not on the page.";
        assert_eq!(find_page(excerpt, &pages()), Some(2));
    }

    #[test]
    fn test_short_excerpt_no_probe() {
        // Under 40 chars there is no second chance.
        assert_eq!(find_page("Revenue increased 12% overall", &pages()), None);
    }

    #[test]
    fn test_prefix_probe_is_char_safe() {
        let pages = vec!["Résumé ünïcödé ".repeat(10)];
        let excerpt = format!("{}tail that does not match", "Résumé ünïcödé ".repeat(6));
        assert_eq!(find_page(&excerpt, &pages), Some(1));
    }

    #[test]
    fn test_match_citations_skips_blank() {
        let citations = match_citations(["", "Cover page", "missing"], &pages());
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].page, Some(1));
        assert_eq!(citations[1].page, None);
        assert_eq!(citations[1].page_number(), 0);
    }
}
