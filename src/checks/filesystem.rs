//! File and directory existence checks.

use crate::engine::check::{CheckContext, Predicate};
use anyhow::Context;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

/// Passes when `path` exists and is a regular file
#[derive(Debug, Clone)]
pub struct FileExists {
    path: PathBuf,
}

impl FileExists {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileExists { path: path.into() }
    }
}

#[async_trait]
impl Predicate for FileExists {
    async fn evaluate(&self, ctx: &CheckContext) -> anyhow::Result<bool> {
        entry_is(ctx, &self.path, EntryKind::File).await
    }
}

/// Passes when `path` exists and is a directory
#[derive(Debug, Clone)]
pub struct DirectoryExists {
    path: PathBuf,
}

impl DirectoryExists {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DirectoryExists { path: path.into() }
    }
}

#[async_trait]
impl Predicate for DirectoryExists {
    async fn evaluate(&self, ctx: &CheckContext) -> anyhow::Result<bool> {
        entry_is(ctx, &self.path, EntryKind::Directory).await
    }
}

async fn entry_is(ctx: &CheckContext, path: &std::path::Path, kind: EntryKind) -> anyhow::Result<bool> {
    let full = ctx.resolve(path);
    match tokio::fs::metadata(&full).await {
        Ok(meta) => Ok(match kind {
            EntryKind::File => meta.is_file(),
            EntryKind::Directory => meta.is_dir(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("cannot inspect {}", full.display())),
    }
}
