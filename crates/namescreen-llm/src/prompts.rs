//! Prompt construction

use namescreen_core::DisambiguationRequest;

use crate::types::LLMMessage;

const DISAMBIGUATION_SYSTEM: &str = "You are an analyst screening news articles for adverse media about a specific person. \
You decide whether a name mentioned in an article refers to the screening target. \
Consider nicknames, initials, transliteration and accents, name order, and how plausible \
it is that two similar names belong to different people (for example Michael and Michelle). \
Answer with a single JSON object and nothing else: \
{\"verdict\": \"yes\" or \"no\", \"confidence\": \"high\", \"medium\" or \"low\", \"reasoning\": \"one or two sentences\"}";

const NICKNAME_SYSTEM: &str = "You list common English nicknames and short forms of given names. \
Answer with a JSON array of at most five lower-case single-word strings and nothing else. \
Answer [] if the name has no common nicknames.";

/// Messages asking whether the best candidate pair refers to the same person
pub fn disambiguation_messages(request: &DisambiguationRequest) -> Vec<LLMMessage> {
    let target = if request.target_name.is_empty() {
        request.best_variant.as_str()
    } else {
        request.target_name.as_str()
    };

    let user = format!(
        "Screening target: {target}\n\
         Known name variants of the target: {variants}\n\
         Person names found in the article: {names}\n\
         Closest pair: variant '{best_variant}' vs article name '{best_name}' (similarity {score:.1} of 100)\n\n\
         Does any person named in the article refer to the screening target?",
        variants = join_quoted(&request.candidate_variants),
        names = join_quoted(&request.candidate_article_names),
        best_variant = request.best_variant,
        best_name = request.best_article_name,
        score = request.fused_score,
    );

    vec![LLMMessage::system(DISAMBIGUATION_SYSTEM), LLMMessage::user(user)]
}

/// Messages asking for nicknames of a given name
pub fn nickname_messages(first_name: &str) -> Vec<LLMMessage> {
    vec![
        LLMMessage::system(NICKNAME_SYSTEM),
        LLMMessage::user(format!("Given name: {first_name}")),
    ]
}

fn join_quoted(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
