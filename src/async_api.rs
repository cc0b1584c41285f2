//! Async API for non-blocking resource loading and annotation.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! jaclean = { version = "0.1", features = ["async"] }
//! ```

use crate::blocklist::DomainBlocklist;
use crate::error::{Error, Result};
use crate::langid::LanguageModel;
use crate::model::{Annotation, Record};
use crate::ngword::NgWordDictionary;
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::resource::decode_bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Io(std::io::Error::other(e.to_string()))
}

async fn read_decoded(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path)
        .await
        .map_err(|e| Error::resource(path, e))?;
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || decode_bytes(data).map_err(|e| Error::resource(owned, e)))
        .await
        .map_err(join_error)?
}

async fn read_json<T: DeserializeOwned + Send + 'static>(path: &Path) -> Result<T> {
    let data = read_decoded(path).await?;
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        serde_json::from_slice(&data).map_err(|e| Error::resource(owned, e))
    })
    .await
    .map_err(join_error)?
}

/// Asynchronously loads a compiled NG-word dictionary.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> jaclean::Result<()> {
/// let dictionary = jaclean::async_api::load_ngword("ngword.dic").await?;
/// println!("Words: {}", dictionary.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_ngword(path: impl AsRef<Path>) -> Result<NgWordDictionary> {
    let path = path.as_ref();
    let data = read_decoded(path).await?;
    NgWordDictionary::from_bytes(&data).map_err(|e| match e {
        Error::ResourceLoad { message, .. } => Error::resource(path, message),
        other => other,
    })
}

/// Asynchronously loads a domain blocklist.
pub async fn load_blocklist(path: impl AsRef<Path>) -> Result<DomainBlocklist> {
    let raw: HashMap<String, Vec<String>> = read_json(path.as_ref()).await?;
    Ok(DomainBlocklist::from_entries(raw))
}

/// Asynchronously loads a language model.
pub async fn load_language_model(path: impl AsRef<Path>) -> Result<LanguageModel> {
    let weights: HashMap<String, f64> = read_json(path.as_ref()).await?;
    Ok(LanguageModel::from_weights(weights))
}

/// Asynchronously annotates a batch of records, preserving order.
pub async fn annotate_batch(pipeline: &Pipeline, records: Vec<Record>) -> Result<Vec<Annotation>> {
    let pipeline = pipeline.clone();
    tokio::task::spawn_blocking(move || pipeline.annotate_batch(&records))
        .await
        .map_err(join_error)
}

/// Async builder that loads every configured resource into a [`Pipeline`].
///
/// # Example
///
/// ```no_run
/// # async fn example() -> jaclean::Result<()> {
/// use jaclean::async_api::AsyncPipelineBuilder;
///
/// let pipeline = AsyncPipelineBuilder::new()
///     .with_ngword("ngword.dic")
///     .with_blocklist("url.json.gz")
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AsyncPipelineBuilder {
    options: PipelineOptions,
    ngword: Option<PathBuf>,
    blocklist: Option<PathBuf>,
    language_model: Option<PathBuf>,
}

impl AsyncPipelineBuilder {
    /// Creates a builder with default options and no resources.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_ngword(mut self, path: impl Into<PathBuf>) -> Self {
        self.ngword = Some(path.into());
        self
    }

    pub fn with_blocklist(mut self, path: impl Into<PathBuf>) -> Self {
        self.blocklist = Some(path.into());
        self
    }

    pub fn with_language_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.language_model = Some(path.into());
        self
    }

    /// Loads the resources concurrently and assembles the pipeline.
    pub async fn build(self) -> Result<Pipeline> {
        let (ngword, blocklist, model) = tokio::try_join!(
            async {
                match &self.ngword {
                    Some(p) => load_ngword(p).await.map(Some),
                    None => Ok(None),
                }
            },
            async {
                match &self.blocklist {
                    Some(p) => load_blocklist(p).await.map(Some),
                    None => Ok(None),
                }
            },
            async {
                match &self.language_model {
                    Some(p) => load_language_model(p).await.map(Some),
                    None => Ok(None),
                }
            },
        )?;

        let mut pipeline = Pipeline::new(self.options);
        if let Some(d) = ngword {
            pipeline = pipeline.with_ngword(d);
        }
        if let Some(b) = blocklist {
            pipeline = pipeline.with_blocklist(b);
        }
        if let Some(m) = model {
            pipeline = pipeline.with_language_model(m);
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::gzip_bytes;

    #[tokio::test]
    async fn test_build_with_resources() {
        let dir = tempfile::tempdir().unwrap();
        let dic = dir.path().join("ngword.dic");
        NgWordDictionary::from_words(["悪口"]).save(&dic).unwrap();
        let urls = dir.path().join("url.json.gz");
        std::fs::write(&urls, gzip_bytes(br#"{"shop.example.jp": ["shopping"]}"#).unwrap())
            .unwrap();
        let model = dir.path().join("model.json");
        std::fs::write(&model, r#"{"あ": 1.0}"#).unwrap();

        let pipeline = AsyncPipelineBuilder::new()
            .with_ngword(&dic)
            .with_blocklist(&urls)
            .with_language_model(&model)
            .build()
            .await
            .unwrap();

        let records = vec![
            Record::new("悪口ああ").with_url("https://shop.example.jp/"),
            Record::new("いい"),
        ];
        let annotations = annotate_batch(&pipeline, records).await.unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].ngword.unwrap().num_ng_letters, 2);
        assert_eq!(annotations[0].url, Some(false));
        assert!(annotations[0].nanigo.unwrap() > 0.0);
        assert_eq!(annotations[1].url, None);
        assert_eq!(annotations[1].nanigo, Some(0.0));
    }

    #[tokio::test]
    async fn test_missing_resource() {
        let result = load_language_model("/nonexistent/model.json").await;
        assert!(matches!(result, Err(Error::ResourceLoad { .. })));
    }
}
