// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Hosting service detection and `debian/watch` synthesis.
//!
//! A project URL is matched against an ordered table of hosting rules. The
//! winning rule's template is rendered with the captured fields and a few
//! derived values, then prefixed with the watch format header.
//!
//! # Examples
//! ```
//! use debpin::watch::WatchSynthesizer;
//! let synth = WatchSynthesizer::new()?;
//! let detection = synth.detect_hosting_service("https://github.com/defnull/bottle", None)?;
//! assert_eq!(detection.proposed_name, "bottle");
//! assert!(detection.watch.starts_with("version=4\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod rules;
pub mod template;

use rules::{DEFAULT_RULES, WATCH_HEADER};
use template::TemplateError;

/// Context fields that only exist when the rule captured a project name
const PROJECT_FIELDS: &[&str] = &["project", "project_first_letter", "pkgname"];

/// Errors that can occur while synthesizing a watch file
#[derive(Debug, Error)]
pub enum WatchError {
    /// The URL does not start with `http://` or `https://`
    #[error("unknown protocol in URL: {0}")]
    InvalidUrl(String),

    /// No hosting rule matched the URL
    #[error("unknown hosting service for URL: {0}")]
    UnknownService(String),

    /// The matched rule did not capture the project its template needs
    #[error("rule `{pattern}` captured no project name from `{url}`")]
    MalformedProject { pattern: String, url: String },

    /// The matched rule's template references a field the rule cannot provide
    #[error("template of rule `{pattern}` references unknown field `{field}`")]
    TemplateField { pattern: String, field: String },

    /// The matched rule's template is not well formed
    #[error("template of rule `{pattern}` is malformed")]
    Template {
        pattern: String,
        #[source]
        source: TemplateError,
    },

    /// A rule pattern failed to compile
    #[error("invalid rule pattern: {0}")]
    RegexError(#[from] regex::Error),
}

/// A single URL pattern to watch template mapping
pub struct HostingRule {
    /// Pattern text as written, used for ordering
    source: String,
    /// Compiled pattern, anchored at the start of the subject
    pattern: Regex,
    /// Template rendered when this rule wins
    template: String,
}

impl HostingRule {
    /// Creates a new hosting rule
    ///
    /// # Arguments
    /// * `pattern` - Regular expression matched at the start of the bare URL
    /// * `template` - Watch template with `{field}` placeholders
    pub fn new(pattern: &str, template: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: pattern.to_string(),
            pattern: Regex::new(&format!("^(?:{pattern})"))?,
            template: template.to_string(),
        })
    }

    /// The pattern text this rule was created from
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Outcome of a successful detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Last path segment of the URL, a display name and default package name
    pub proposed_name: String,
    /// Package name substituted into the template, if any was available
    pub pkgname: Option<String>,
    /// Full contents of the `debian/watch` file
    pub watch: String,
}

impl Detection {
    /// Splits into `(proposed_name, watch)`
    pub fn into_parts(self) -> (String, String) {
        (self.proposed_name, self.watch)
    }
}

/// Watch synthesis engine holding the ordered rule table
pub struct WatchSynthesizer {
    rules: Vec<HostingRule>,
}

impl WatchSynthesizer {
    /// Creates a synthesizer with the built-in hosting rules
    pub fn new() -> Result<Self, WatchError> {
        Self::with_rules(DEFAULT_RULES.iter().copied())
    }

    /// Creates a synthesizer from arbitrary `(pattern, template)` pairs
    pub fn with_rules<'a>(
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, WatchError> {
        let mut rules = rules
            .into_iter()
            .map(|(pattern, template)| HostingRule::new(pattern, template))
            .collect::<Result<Vec<_>, _>>()?;
        rules.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(Self { rules })
    }

    /// Adds a rule, keeping the table sorted by pattern text
    pub fn add_rule(&mut self, rule: HostingRule) {
        self.rules.push(rule);
        self.rules.sort_by(|a, b| a.source.cmp(&b.source));
    }

    /// Rules in the order they are tried
    pub fn rules(&self) -> &[HostingRule] {
        &self.rules
    }

    /// Detects the hosting service of `url` and renders its watch file
    ///
    /// # Arguments
    /// * `url` - Project URL, must start with `http://` or `https://`
    /// * `pkg_name` - Package name override; defaults to the lowercased project
    ///
    /// # Returns
    /// * `Ok(Detection)` with the proposed project name and watch contents
    /// * `Err(WatchError)` when the URL is unsupported or the rule is inconsistent
    pub fn detect_hosting_service(
        &self,
        url: &str,
        pkg_name: Option<&str>,
    ) -> Result<Detection, WatchError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(WatchError::InvalidUrl(url.to_string()));
        }

        let bare = bare_url(url);

        let (rule, caps) = self
            .rules
            .iter()
            .find_map(|rule| rule.pattern.captures(bare).map(|caps| (rule, caps)))
            .ok_or_else(|| WatchError::UnknownService(url.to_string()))?;

        let mut fields = BTreeMap::new();
        for name in rule.pattern.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                fields.insert(name.to_string(), m.as_str().to_string());
            }
        }
        fields.insert("url".to_string(), bare.to_string());

        let project = fields.get("project").filter(|p| !p.is_empty()).cloned();
        if let Some(first) = project.as_ref().and_then(|p| p.chars().next()) {
            fields.insert("project_first_letter".to_string(), first.to_string());
        }

        let pkgname = pkg_name
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| project.as_ref().map(|p| p.to_lowercase()));
        if let Some(pkgname) = &pkgname {
            fields.insert("pkgname".to_string(), pkgname.clone());
        }
        if project.is_none() {
            fields.remove("project");
        }

        let proposed_name = bare.rsplit('/').next().unwrap_or(bare).to_string();
        debug!(rule = rule.source(), "Matched hosting rule");
        debug!("Package name: {}", pkgname.as_deref().unwrap_or("<none>"));
        debug!("Project name: {}", proposed_name);

        let body = template::render(&rule.template, &fields).map_err(|e| match e {
            TemplateError::MissingField(field) if PROJECT_FIELDS.contains(&field.as_str()) => {
                WatchError::MalformedProject {
                    pattern: rule.source.clone(),
                    url: url.to_string(),
                }
            }
            TemplateError::MissingField(field) => WatchError::TemplateField {
                pattern: rule.source.clone(),
                field,
            },
            source => WatchError::Template {
                pattern: rule.source.clone(),
                source,
            },
        })?;

        Ok(Detection {
            proposed_name,
            pkgname,
            watch: format!("{WATCH_HEADER}{body}"),
        })
    }
}

/// Detects the hosting service of `url` using the built-in rules
///
/// Returns `(proposed_project_name, watch_file_contents)`.
pub fn detect_hosting_service(
    url: &str,
    pkg_name: Option<&str>,
) -> Result<(String, String), WatchError> {
    let synth = WatchSynthesizer::new()?;
    Ok(synth.detect_hosting_service(url, pkg_name)?.into_parts())
}

/// Strips trailing slashes and everything up to the second `/`
fn bare_url(url: &str) -> &str {
    let url = url.trim_end_matches('/');
    url.splitn(3, '/').last().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(url: &str, pkg_name: Option<&str>) -> Result<Detection, WatchError> {
        WatchSynthesizer::new()
            .expect("Failed to create synthesizer")
            .detect_hosting_service(url, pkg_name)
    }

    #[test]
    fn test_rules_sorted() {
        let synth = WatchSynthesizer::new().unwrap();
        let sources = synth.rules().iter().map(|r| r.source()).collect::<Vec<_>>();
        let mut sorted = sources.clone();
        sorted.sort();
        assert_eq!(sources, sorted);
        assert_eq!(sources.len(), DEFAULT_RULES.len());
        assert!(sources[0].starts_with("bitbucket.org"));
        assert!(sources[sources.len() - 1].starts_with("search.cpan.org"));
    }

    #[test]
    fn test_bare_url() {
        assert_eq!(bare_url("https://github.com/defnull/bottle/"), "github.com/defnull/bottle");
        assert_eq!(bare_url("http://launchpad.net/diodon///"), "launchpad.net/diodon");
        assert_eq!(bare_url("https://"), "https:");
    }

    #[test]
    fn test_github() {
        let d = detect("https://github.com/defnull/bottle", None).unwrap();
        assert_eq!(d.proposed_name, "bottle");
        assert_eq!(d.pkgname.as_deref(), Some("bottle"));
        assert_eq!(
            d.watch,
            r"version=4
opts=filenamemangle=s/.+\/v?(\d\S+)\.tar\.gz/bottle-$1\.tar\.gz/ \
  https://github.com/defnull/bottle/tags .*/v?(\d\S+)\.tar\.gz
"
        );
    }

    #[test]
    fn test_known_services() {
        let known_good = vec![
            (
                "http://launchpad.net/diodon/",
                "diodon",
                r"version=4
opts=pgpsigurlmangle=s/$/.asc/ https://launchpad.net/diodon/ \
  https://launchpad.net/.*download/diodon-([.\d]+)\.(?:tar\.(?:gz|bz2|xz))
",
            ),
            (
                "https://bitbucket.org/regebro/pyroma",
                "pyroma",
                r"version=4
https://bitbucket.org/regebro/pyroma/downloads?tab=tags \
  .*/v?(\d\S+)\.tar\.gz
",
            ),
            (
                "https://code.google.com/p/ntplib/",
                "ntplib",
                r"version=4
https://code.google.com/p/ntplib/downloads/list?can=1 \
  .*/ntplib-(\d\S+)\.(?:zip|tgz|tbz|txz|(?:tar\.(?:gz|bz2|xz)))
",
            ),
            (
                "https://pypi.python.org/pypi/geoip-lastlog/",
                "geoip-lastlog",
                concat!(
                    r#"version=4
opts="uversionmangle=s/(\d)[_\.\-\+]?((RC|rc|pre|dev|beta|alpha)\d+)$/$1~$2/,\
  pgpsigurlmangle=s/$/.asc/" \
  https://pypi.debian.net/geoip-lastlog/geoip-lastlog-(.+)"#,
                    r"\.(?:zip|tgz|tbz|txz|(?:tar\.(?:gz|bz2|xz)))
"
                ),
            ),
            (
                "https://gitlab.com/inkscape/inkscape",
                "inkscape",
                r"version=4
opts=filenamemangle=s/.*\/archive\/(\d\S+)\/inkscape.*\.tar\.gz/inkscape-$1\.tar\.gz/g \
  https://gitlab.com/inkscape/inkscape/tags?sort=updated_desc \
  .*/archive/(\d\S+)/.*\.tar\.gz.*
",
            ),
            (
                "https://codingteam.net/project/gajim",
                "gajim",
                r"version=4
https://codingteam.net/project/gajim/download \
  project/gajim/download/file/gajim-v?(\d\S+)\.tar\.gz
",
            ),
            (
                "https://metacpan.org/release/Moose",
                "Moose",
                r"version=4
https://metacpan.org/release/Moose .*/Moose-v?(\d[\d.]+)\.(?:tar(?:\.gz|\.bz2)?|tgz|zip)$
",
            ),
            (
                "http://search.cpan.org/dist/Moose/",
                "Moose",
                r"version=4
https://search.cpan.org/dist/Moose/ \
  .*/Moose-v?(\d[\d.-]+)\.(?:tar(?:\.gz|\.bz2)?|tgz|zip)$
",
            ),
        ];

        for (url, name, expected) in known_good {
            eprintln!("Testing url: {}", url);
            let d = detect(url, None).expect("Failed to detect hosting service");
            assert_eq!(d.proposed_name, name);
            assert_eq!(d.watch, expected);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = detect("https://gitlab.com/inkscape/inkscape", Some("inkscape")).unwrap();
        let b = detect("https://gitlab.com/inkscape/inkscape", Some("inkscape")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pkgname_override() {
        let d = detect("https://github.com/defnull/Bottle", Some("Python-Bottle")).unwrap();
        assert_eq!(d.proposed_name, "Bottle");
        assert!(d.watch.contains("/Python-Bottle-$1"));

        let d = detect("https://github.com/defnull/Bottle", None).unwrap();
        assert_eq!(d.pkgname.as_deref(), Some("bottle"));
        assert!(d.watch.contains("/bottle-$1"));

        let d = detect("https://github.com/defnull/Bottle", Some("")).unwrap();
        assert!(d.watch.contains("/bottle-$1"));
    }

    #[test]
    fn test_invalid_url() {
        for url in ["ftp://example.com/project", "github.com/defnull/bottle", "", "http:/x"] {
            assert!(
                matches!(detect(url, None), Err(WatchError::InvalidUrl(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_unknown_service() {
        for url in [
            "https://example.com/unknown/project",
            "https://www.github.com/defnull/bottle",
            "https://github.com/defnull",
            "https://",
        ] {
            assert!(
                matches!(detect(url, None), Err(WatchError::UnknownService(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_malformed_project() {
        let err = detect("https://metacpan.org", None).unwrap_err();
        assert!(matches!(err, WatchError::MalformedProject { .. }));

        let err = detect("https://launchpad.net/+login", None).unwrap_err();
        assert!(matches!(err, WatchError::MalformedProject { .. }));
    }

    #[test]
    fn test_template_field() {
        let synth = WatchSynthesizer::with_rules([(
            r"example.org/(?P<project>\w+)",
            "\n{user}/{project}\n",
        )])
        .unwrap();
        let err = synth
            .detect_hosting_service("https://example.org/thing", None)
            .unwrap_err();
        match err {
            WatchError::TemplateField { field, .. } => assert_eq!(field, "user"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_precedence() {
        let mut synth = WatchSynthesizer::with_rules([
            (r"github.com/(?P<project>[\w\-]*)", "\nsecond {project}\n"),
            (r"github.com/(?P<user>[\w\-]*)/(?P<project>[\w\-]*)", "\nthird {user}\n"),
        ])
        .unwrap();
        synth.add_rule(HostingRule::new(r"git", "\nfirst {url}\n").unwrap());

        let d = synth
            .detect_hosting_service("https://github.com/defnull/bottle", None)
            .unwrap();
        assert_eq!(d.watch, "version=4\nfirst github.com/defnull/bottle\n");

        // Both remaining patterns match, the lexicographically smaller one wins.
        let synth = WatchSynthesizer::with_rules([
            (r"github.com/(?P<user>[\w\-]*)/(?P<project>[\w\-]*)", "\nthird {user}\n"),
            (r"github.com/(?P<project>[\w\-]*)", "\nsecond {project}\n"),
        ])
        .unwrap();
        let d = synth
            .detect_hosting_service("https://github.com/defnull/bottle", None)
            .unwrap();
        assert_eq!(d.watch, "version=4\nsecond defnull\n");
    }

    #[test]
    fn test_project_first_letter() {
        let synth = WatchSynthesizer::with_rules([(
            r"pypi.python.org/pypi/(?P<project>[\w\.\-]*)",
            "\nhttps://pypi.python.org/packages/source/{project_first_letter}/{project}/\n",
        )])
        .unwrap();
        let d = synth
            .detect_hosting_service("https://pypi.python.org/pypi/geoip-lastlog/", None)
            .unwrap();
        assert_eq!(
            d.watch,
            "version=4\nhttps://pypi.python.org/packages/source/g/geoip-lastlog/\n"
        );
    }

    #[test]
    fn test_free_function() {
        let (name, watch) =
            detect_hosting_service("https://bitbucket.org/regebro/pyroma", None).unwrap();
        assert_eq!(name, "pyroma");
        assert!(watch.contains("bitbucket.org/regebro/pyroma/downloads?tab=tags"));
    }
}
