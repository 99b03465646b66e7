//! Retrieval-assisted fallback shared by adapters with permissioned
//! grounding features.

use crate::search::SearchResult;

/// Build the prompt for the search-assisted fallback path: the retrieved
/// results as numbered context, then the original question, with an
/// instruction to answer from that context only.
#[must_use]
pub(crate) fn build_fallback_prompt(question: &str, results: &[SearchResult]) -> String {
    let mut context = String::new();
    for (i, result) in results.iter().enumerate() {
        context.push_str(&format!(
            "[{n}] {title}\n{url}\n{description}\n\n",
            n = i + 1,
            title = result.title,
            url = result.url,
            description = result.description,
        ));
    }
    format!(
        "Using only the following web search results as context, answer the question.\n\
         If the results do not contain the answer, say so.\n\n\
         Web results:\n{context}Question: {question}"
    )
}

/// Sources to attach to a fallback answer — the retrieved results
/// themselves, since the model saw nothing else.
pub(crate) fn fallback_sources(results: &[SearchResult]) -> Vec<crate::types::Source> {
    results
        .iter()
        .map(|r| crate::types::Source {
            url: r.url.clone(),
            title: Some(r.title.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<SearchResult> {
        vec![
            SearchResult {
                title: "Acme Plumbing".to_string(),
                url: "https://acme.example".to_string(),
                description: "Pipe repair in Sydney".to_string(),
            },
            SearchResult {
                title: "DrainPro".to_string(),
                url: "https://drainpro.example".to_string(),
                description: String::new(),
            },
        ]
    }

    #[test]
    fn prompt_contains_numbered_results_and_question() {
        let prompt = build_fallback_prompt("Who fixes pipes in Sydney?", &results());
        assert!(prompt.contains("[1] Acme Plumbing"));
        assert!(prompt.contains("[2] DrainPro"));
        assert!(prompt.contains("Question: Who fixes pipes in Sydney?"));
        assert!(prompt.contains("only the following web search results"));
    }

    #[test]
    fn fallback_sources_carry_titles() {
        let sources = fallback_sources(&results());
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title.as_deref(), Some("Acme Plumbing"));
        assert_eq!(sources[1].url, "https://drainpro.example");
    }
}
