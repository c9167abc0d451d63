// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Built-in hosting rules.
//!
//! Templates follow <https://wiki.debian.org/debian/watch> and
//! <https://wiki.debian.org/Python/LibraryStyleGuide>. The regexes inside
//! each template are evaluated by uscan, never locally.

/// Header line emitted ahead of every rendered template
pub const WATCH_HEADER: &str = "version=4";

/// `(url_pattern, watch_template)` pairs. Order here is irrelevant, the
/// synthesizer sorts by pattern text.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    (
        r"github.com/(?P<user>[\w\-]*)/(?P<project>[\w\-]*)",
        r"
opts=filenamemangle=s/.+\/v?(\d\S+)\.tar\.gz/{pkgname}-$1\.tar\.gz/ \
  https://{url}/tags .*/v?(\d\S+)\.tar\.gz
",
    ),
    (
        r"pypi.python.org/pypi/(?P<project>[\w\.\-]*)",
        r#"
opts="uversionmangle=s/(\d)[_\.\-\+]?((RC|rc|pre|dev|beta|alpha)\d+)$/$1~$2/,\
  pgpsigurlmangle=s/$/.asc/" \
  https://pypi.debian.net/{project}/{project}-(.+)\.(?:zip|tgz|tbz|txz|(?:tar\.(?:gz|bz2|xz)))
"#,
    ),
    (
        r"gitlab.com/(?P<user>[\w\-]*)/(?P<project>[\w\-]*)",
        r"
opts=filenamemangle=s/.*\/archive\/(\d\S+)\/{project}.*\.tar\.gz/{project}-$1\.tar\.gz/g \
  https://gitlab.com/{user}/{project}/tags?sort=updated_desc \
  .*/archive/(\d\S+)/.*\.tar\.gz.*
",
    ),
    (
        r"bitbucket.org/(?P<user>[\w\-]*)/(?P<project>[\w\-]*)",
        r"
https://bitbucket.org/{user}/{project}/downloads?tab=tags \
  .*/v?(\d\S+)\.tar\.gz
",
    ),
    (
        r"metacpan.org(?:/(?:release|dist|pod)/(?P<project>[\w\-]*))?",
        r"
https://metacpan.org/release/{project} .*/{project}-v?(\d[\d.]+)\.(?:tar(?:\.gz|\.bz2)?|tgz|zip)$
",
    ),
    (
        r"search.cpan.org(?:/dist/(?P<project>[\w\-]*))?",
        r"
https://search.cpan.org/dist/{project}/ \
  .*/{project}-v?(\d[\d.-]+)\.(?:tar(?:\.gz|\.bz2)?|tgz|zip)$
",
    ),
    (
        r"launchpad.net/(?P<project>[\w\-]*)",
        r"
opts=pgpsigurlmangle=s/$/.asc/ https://launchpad.net/{project}/ \
  https://launchpad.net/.*download/{project}-([.\d]+)\.(?:tar\.(?:gz|bz2|xz))
",
    ),
    (
        r"code.google.com/p/(?P<project>[\w\-]*)",
        r"
https://code.google.com/p/{project}/downloads/list?can=1 \
  .*/{project}-(\d\S+)\.(?:zip|tgz|tbz|txz|(?:tar\.(?:gz|bz2|xz)))
",
    ),
    (
        r"codingteam.net/project/(?P<project>[\w\-]*)",
        r"
https://codingteam.net/project/{project}/download \
  project/{project}/download/file/{project}-v?(\d\S+)\.tar\.gz
",
    ),
];
