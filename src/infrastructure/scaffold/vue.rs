//! Vue + Vite project scaffolder
//!
//! Synthesizes a minimal self-consistent SPA skeleton: a manifest with the
//! dev/build/preview script triad and a pinned dependency set, a Vite
//! config, an HTML shell, the bootstrap entry and one placeholder
//! component. Pure file synthesis - the builder owns every subprocess.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::generation::{
    AppId, Artifact, GenerationError, OutputDirectory, OutputKind, ProjectScaffolder,
};
use crate::infrastructure::output::write_artifacts;

const PACKAGE_JSON: &str = r#"{
  "name": "{{ package_name }}",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "vite build",
    "preview": "vite preview"
  },
  "dependencies": {
    "vue": "^3.4.21"
  },
  "devDependencies": {
    "@vitejs/plugin-vue": "^5.0.4",
    "vite": "^5.2.8"
  }
}
"#;

const VITE_CONFIG: &str = r#"import { defineConfig } from 'vite'
import vue from '@vitejs/plugin-vue'

export default defineConfig({
  plugins: [vue()],
})
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{{ app_title }}</title>
  </head>
  <body>
    <div id="app"></div>
    <script type="module" src="/src/main.js"></script>
  </body>
</html>
"#;

const MAIN_JS: &str = r#"import { createApp } from 'vue'
import App from './App.vue'

createApp(App).mount('#app')
"#;

const APP_VUE: &str = r#"<script setup>
</script>

<template>
  <main>
    <h1>{{ app_title }}</h1>
    <p>Replace this placeholder component with the generated application.</p>
  </main>
</template>

<style scoped>
main {
  font-family: sans-serif;
  text-align: center;
  margin-top: 4rem;
}
</style>
"#;

/// Scaffolder producing a buildable Vue skeleton under the configured
/// output root.
pub struct VueScaffolder {
    config: Arc<GenerationConfig>,
}

impl VueScaffolder {
    pub fn new(config: Arc<GenerationConfig>) -> Self {
        Self { config }
    }

    fn render(template: &str, app_id: AppId) -> Result<String, GenerationError> {
        let mut context = tera::Context::new();
        context.insert("package_name", &format!("generated-app-{app_id}"));
        context.insert("app_title", &format!("Generated App {app_id}"));
        tera::Tera::one_off(template, &context, false)
            .map_err(|e| GenerationError::Template(e.to_string()))
    }

    fn skeleton(app_id: AppId) -> Result<Vec<Artifact>, GenerationError> {
        Ok(vec![
            Artifact::new("package.json", Self::render(PACKAGE_JSON, app_id)?),
            Artifact::new("vite.config.js", VITE_CONFIG),
            Artifact::new("index.html", Self::render(INDEX_HTML, app_id)?),
            Artifact::new("src/main.js", MAIN_JS),
            Artifact::new("src/App.vue", Self::render(APP_VUE, app_id)?),
        ])
    }
}

#[async_trait]
impl ProjectScaffolder for VueScaffolder {
    async fn scaffold(
        &self,
        app_id: AppId,
        notes: Option<&str>,
    ) -> Result<OutputDirectory, GenerationError> {
        let directory = OutputDirectory::resolve(
            &self.config.output_root,
            OutputKind::FrameworkProject,
            app_id,
        );

        let mut artifacts = Self::skeleton(app_id)?;
        if let Some(notes) = notes.map(str::trim).filter(|s| !s.is_empty()) {
            let mut readme = notes.to_string();
            if !readme.ends_with('\n') {
                readme.push('\n');
            }
            artifacts.push(Artifact::new("README.md", readme));
        }

        // Overwrites the skeleton in place; anything else in the directory
        // (a previous build's dist/, installed dependencies) is left alone.
        write_artifacts(&directory, &artifacts).await?;

        tracing::debug!(
            app_id,
            path = %directory.path().display(),
            files = artifacts.len(),
            "scaffolded framework project"
        );
        Ok(directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scaffolder_for(root: &std::path::Path) -> VueScaffolder {
        VueScaffolder::new(Arc::new(GenerationConfig::default().with_output_root(root)))
    }

    #[tokio::test]
    async fn test_scaffold_produces_buildable_skeleton() {
        let root = tempdir().unwrap();
        let scaffolder = scaffolder_for(root.path());

        let dir = scaffolder.scaffold(5, None).await.unwrap();

        assert!(dir.path().ends_with("vue_project_5"));
        for file in [
            "package.json",
            "vite.config.js",
            "index.html",
            "src/main.js",
            "src/App.vue",
        ] {
            assert!(dir.path().join(file).exists(), "missing {file}");
        }
        // No notes were supplied, so no README appears.
        assert!(!dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn test_manifest_declares_script_triad() {
        let root = tempdir().unwrap();
        let scaffolder = scaffolder_for(root.path());

        let dir = scaffolder.scaffold(6, None).await.unwrap();

        let manifest: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["name"], "generated-app-6");
        for script in ["dev", "build", "preview"] {
            assert!(manifest["scripts"][script].is_string(), "missing {script}");
        }
        assert!(manifest["dependencies"]["vue"].is_string());
        assert!(manifest["devDependencies"]["vite"].is_string());
    }

    #[tokio::test]
    async fn test_shell_references_entry_file() {
        let root = tempdir().unwrap();
        let scaffolder = scaffolder_for(root.path());

        let dir = scaffolder.scaffold(7, None).await.unwrap();

        let shell = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(shell.contains(r#"<div id="app"></div>"#));
        assert!(shell.contains("/src/main.js"));
        assert!(shell.contains("Generated App 7"));

        let entry = std::fs::read_to_string(dir.path().join("src/main.js")).unwrap();
        assert!(entry.contains("createApp(App).mount('#app')"));
    }

    #[tokio::test]
    async fn test_notes_become_readme() {
        let root = tempdir().unwrap();
        let scaffolder = scaffolder_for(root.path());

        let dir = scaffolder
            .scaffold(8, Some("A todo list with drag and drop."))
            .await
            .unwrap();

        let readme = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert_eq!(readme, "A todo list with drag and drop.\n");
        // The skeleton is still complete alongside the README.
        assert!(dir.path().join("package.json").exists());
    }

    #[tokio::test]
    async fn test_rescaffold_is_idempotent_and_preserves_build_output() {
        let root = tempdir().unwrap();
        let scaffolder = scaffolder_for(root.path());

        let first = scaffolder.scaffold(9, None).await.unwrap();

        // Simulate a prior build having produced artifacts.
        std::fs::create_dir_all(first.path().join("dist")).unwrap();
        std::fs::write(first.path().join("dist/bundle.js"), "bundled").unwrap();

        let second = scaffolder.scaffold(9, Some("notes")).await.unwrap();

        assert_eq!(first.absolute_path(), second.absolute_path());
        assert_eq!(
            std::fs::read_to_string(second.path().join("dist/bundle.js")).unwrap(),
            "bundled"
        );
        assert!(second.path().join("README.md").exists());
    }
}
