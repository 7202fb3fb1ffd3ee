//! Zero-shot style tagging.
//!
//! Each style category gets one text prompt ("a photo of streetwear menswear
//! outfit", ...). The prompts are embedded once through the model service;
//! an image is tagged by taking the softmax over its similarities to the
//! prompt vectors and picking the argmax style.

use crate::vector::{dot, normalize};
use crate::{EmbedderError, EmbeddingClient};
use catalog::Style;
use tracing::info;

/// Tags image embeddings with a style category and a confidence.
#[derive(Debug, Clone)]
pub struct StyleTagger {
    /// Unit-normalized prompt embedding per style, in [`Style::ALL`] order
    prompts: Vec<(Style, Vec<f32>)>,
}

impl StyleTagger {
    /// Build a tagger by embedding all style prompts through the service.
    pub async fn from_client(client: &mut EmbeddingClient) -> Result<Self, EmbedderError> {
        let texts: Vec<String> = Style::ALL.iter().map(|s| s.prompt()).collect();
        let mut vectors = client.embed_texts(texts).await?;
        for v in &mut vectors {
            normalize(v);
        }
        info!("Embedded {} style prompts", vectors.len());
        Ok(Self::from_prompt_vectors(vectors))
    }

    /// Build a tagger from precomputed prompt vectors, in [`Style::ALL`] order.
    pub fn from_prompt_vectors(mut vectors: Vec<Vec<f32>>) -> Self {
        assert_eq!(
            vectors.len(),
            Style::ALL.len(),
            "one prompt vector per style required"
        );
        for v in &mut vectors {
            normalize(v);
        }
        let prompts = Style::ALL.iter().copied().zip(vectors).collect();
        Self { prompts }
    }

    /// Tag one image embedding.
    ///
    /// Returns the argmax style and its softmax probability over all styles.
    /// The input is expected to be unit-normalized.
    pub fn tag(&self, embedding: &[f32]) -> (Style, f32) {
        let logits: Vec<f32> = self
            .prompts
            .iter()
            .map(|(_, prompt)| dot(embedding, prompt))
            .collect();

        // Stable softmax over the similarities
        let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let sum: f32 = exps.iter().sum();

        let mut best = 0;
        for (i, e) in exps.iter().enumerate() {
            if *e > exps[best] {
                best = i;
            }
        }
        (self.prompts[best].0, exps[best] / sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One orthogonal axis per style, so tagging is unambiguous.
    fn axis_tagger() -> StyleTagger {
        let vectors: Vec<Vec<f32>> = (0..Style::ALL.len())
            .map(|i| {
                let mut v = vec![0.0f32; Style::ALL.len()];
                v[i] = 1.0;
                v
            })
            .collect();
        StyleTagger::from_prompt_vectors(vectors)
    }

    #[test]
    fn test_tag_picks_nearest_prompt() {
        let tagger = axis_tagger();

        // An embedding pointing along the "formal" axis (index 1)
        let mut embedding = vec![0.0f32; Style::ALL.len()];
        embedding[1] = 1.0;

        let (style, confidence) = tagger.tag(&embedding);
        assert_eq!(style, Style::Formal);
        assert!(confidence > 1.0 / Style::ALL.len() as f32);
    }

    #[test]
    fn test_tag_confidence_is_probability() {
        let tagger = axis_tagger();
        let mut embedding = vec![0.1f32; Style::ALL.len()];
        embedding[3] = 0.9;
        normalize(&mut embedding);

        let (style, confidence) = tagger.tag(&embedding);
        assert_eq!(style, Style::Vintage);
        assert!(confidence > 0.0 && confidence <= 1.0);
    }

    #[test]
    fn test_uniform_embedding_yields_uniform_confidence() {
        let tagger = axis_tagger();
        let mut embedding = vec![1.0f32; Style::ALL.len()];
        normalize(&mut embedding);

        let (_, confidence) = tagger.tag(&embedding);
        assert!((confidence - 1.0 / Style::ALL.len() as f32).abs() < 1e-5);
    }
}
