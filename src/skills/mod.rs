use std::sync::Arc;

use fxhash::FxHashSet;

#[cfg(feature = "pos-model")]
mod bert;


/// The coarse word classes skill extraction cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartOfSpeech {
    Noun,
    ProperNoun,
    Adjective,
    Other
}


impl PartOfSpeech {
    /// Maps both Universal Dependencies and Penn Treebank labels.
    pub(crate) fn from_label(label: &str) -> Self {
        match label {
            "NOUN" | "NN" | "NNS" => Self::Noun,
            "PROPN" | "NNP" | "NNPS" => Self::ProperNoun,
            "ADJ" | "JJ" | "JJR" | "JJS" => Self::Adjective,
            _ => Self::Other
        }
    }

    fn continues_phrase(self) -> bool {
        !matches!(self, Self::Other)
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaggedToken {
    pub(crate) text: String,
    pub(crate) pos: PartOfSpeech
}


/// Splits text into tokens and assigns each a part of speech.
///
/// Implementations are built once at startup and shared by every page being parsed.
pub(crate) trait PosTagger: Send + Sync {
    fn tag(&self, text: &str) -> anyhow::Result<Vec<TaggedToken>>;
}


/// Collects runs of consecutive nouns, proper nouns and adjectives as phrases.
///
/// Phrases are deduplicated in the order they are first seen, and at most `limit` are kept.
pub(crate) fn skill_phrases(tokens: &[TaggedToken], limit: usize) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    for token in tokens {
        if token.pos.continues_phrase() {
            run.push(&token.text);
        } else if !run.is_empty() {
            phrases.push(run.join(" "));
            run.clear();
        }
    }
    if !run.is_empty() {
        phrases.push(run.join(" "));
    }

    let mut seen = FxHashSet::default();
    phrases
        .into_iter()
        .filter(|phrase| seen.insert(phrase.clone()))
        .take(limit)
        .collect()
}


pub(crate) fn extract_skills(tagger: &dyn PosTagger, text: &str, limit: usize) -> anyhow::Result<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let tokens = tagger.tag(text)?;
    Ok(skill_phrases(&tokens, limit))
}


/// Loads the tagger used for the whole crawl. This blocks while the model is loaded.
#[cfg(feature = "pos-model")]
pub(crate) fn load_tagger() -> anyhow::Result<Arc<dyn PosTagger>> {
    Ok(Arc::new(bert::BertTagger::spawn()?))
}


#[cfg(not(feature = "pos-model"))]
pub(crate) fn load_tagger() -> anyhow::Result<Arc<dyn PosTagger>> {
    anyhow::bail!("No part of speech tagger available. Rebuild with `--features pos-model`")
}
