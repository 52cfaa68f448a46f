//! Static image catalog: distribution name → verified download source.
//!
//! The table is compiled into the binary. A new image or digest means a new
//! release; nothing mutates the catalog at runtime.

use std::collections::BTreeMap;

use crate::domain::error::DistroError;

/// One downloadable distribution image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCatalogEntry {
    pub name: String,
    pub url: String,
    /// Lowercase hex SHA-256, normalised on construction.
    pub sha256: String,
}

impl ImageCatalogEntry {
    #[must_use]
    pub fn new(name: &str, url: &str, sha256: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            sha256: normalize_digest(sha256),
        }
    }
}

/// Strip an optional `0x` prefix and lowercase the digest.
///
/// Several vendors publish their digests as `0x…`; the computed digest is
/// always plain lowercase hex.
#[must_use]
pub fn normalize_digest(raw: &str) -> String {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex.to_ascii_lowercase()
}

/// Encode bytes as lowercase hex string.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}

/// Immutable name-keyed catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, ImageCatalogEntry>,
}

impl Catalog {
    /// Build a catalog from explicit entries. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ImageCatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.name.clone(), e))
                .collect(),
        }
    }

    /// The catalog shipped with this release.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(name, url, sha)| ImageCatalogEntry::new(name, url, sha)),
        )
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ImageCatalogEntry> {
        self.entries.get(name)
    }

    /// Look up `name`, failing with [`DistroError::NotInCatalog`].
    pub fn require(&self, name: &str) -> Result<&ImageCatalogEntry, DistroError> {
        self.get(name)
            .ok_or_else(|| DistroError::NotInCatalog(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageCatalogEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const BUILTIN: &[(&str, &str, &str)] = &[
    (
        "Ubuntu-24.04",
        "https://releases.ubuntu.com/24.04/ubuntu-24.04.3-wsl-amd64.wsl",
        "c74833a55e525b1e99e1541509c566bb3e32bdb53bf27ea3347174364a57f47c",
    ),
    (
        "Ubuntu-25.04",
        "https://releases.ubuntu.com/25.04/ubuntu-25.04-wsl-amd64.wsl",
        "91f3e836698719846191821300bd21f321811abcef6f448bf8d7d8f8517b2743",
    ),
    (
        "Ubuntu-25.10",
        "https://releases.ubuntu.com/25.10/ubuntu-25.10-wsl-amd64.wsl",
        "05299da14668ed5e1ddb49b92618725c5e6b55fca5bd163e314c227803af27e1",
    ),
    (
        "Ubuntu-26.04",
        "https://releases.ubuntu.com/26.04-snapshot1/ubuntu-26.04-wsl-amd64.wsl",
        "c77c9e8a5b0255cd02f5edbcd612663976d995980107ce116b2b61f9244cce79",
    ),
    (
        "Debian",
        "https://salsa.debian.org/debian/WSL/-/jobs/7949331/artifacts/raw/Debian_WSL_AMD64_v1.22.0.0.wsl",
        "543123ccc5f838e63dac81634fb0223dc8dcaa78fdb981387d625feb1ed168c7",
    ),
    (
        "Kali",
        "https://kali.download/wsl-images/kali-2025.4/kali-linux-2025.4-wsl-rootfs-amd64.wsl",
        "86aba7bb3d74d313e349f9f50d3f6119ee3b1491072920d063f17ce9b3f706ab",
    ),
    (
        "Arch",
        "https://fastly.mirror.pkgbuild.com/wsl/2026.01.01.156076/archlinux-2026.01.01.156076.wsl",
        "e3820c60df62edc22df29c9c16d2205512d95c1b086232a9b7bc3960542036d4",
    ),
    (
        "Fedora",
        "https://download.fedoraproject.org/pub/fedora/linux/releases/43/Container/x86_64/images/Fedora-WSL-Base-43-1.6.x86_64.wsl",
        "220780af9cf225e9645313b4c7b0457a26a38a53285eb203b2ab6188d54d5b82",
    ),
    (
        "openSUSE-Tumbleweed",
        "https://github.com/openSUSE/WSL-instarball/releases/download/v20260106.0/openSUSE-Tumbleweed-20260103.x86_64-1.224-Build1.224.wsl",
        "0x394be699da2821b331355f3541e237aa3aa00bc4068f33283d68303d8336d484",
    ),
    (
        "openSUSE-Leap-16.0",
        "https://github.com/openSUSE/WSL-instarball/releases/download/v20251001.0/openSUSE-Leap-16.0-16.0.x86_64-22.57-Build22.57.wsl",
        "0x0d1faa095153beee0a9b5089b0f9aa3d2aec95e2cdcffdeeff84dd54c48b8393",
    ),
    (
        "AlmaLinux-8",
        "https://github.com/AlmaLinux/wsl-images/releases/download/v8.10.20250415.0/AlmaLinux-8.10_x64_20250415.0.wsl",
        "34c3bc6d3ac693968737c65db52b67f68b8c1a6f8b024450819841a967f59a3d",
    ),
    (
        "AlmaLinux-9",
        "https://github.com/AlmaLinux/wsl-images/releases/download/v9.7.20251119.0/AlmaLinux-9.7_x64_20251119.0.wsl",
        "0a6588f4f723fcb3edbc37dd3e3e13be8ffe0a5027e47513e3d4d2a4451794e7",
    ),
    (
        "AlmaLinux-Kitten-10",
        "https://github.com/AlmaLinux/wsl-images/releases/download/v10-kitten.20251030.0/AlmaLinux-Kitten-10_x64_20251030.0.wsl",
        "d765d65076b041f3a67ba60edc37d056eeab2a260aed8e077684e05b78ecd9f5",
    ),
    (
        "AlmaLinux-10",
        "https://github.com/AlmaLinux/wsl-images/releases/download/v10.1.20251124.0/AlmaLinux-10.1_x64_20251124.0.wsl",
        "24e8fa286a4081979d97e83a227fb89f332bcf731fe4b422679a3b455ab0be37",
    ),
    (
        "SUSE-Linux-Enterprise-16.0",
        "https://github.com/SUSE/WSL-instarball/releases/download/v20251201.0/SUSE-Linux-Enterprise-16.0-16.0.x86_64-1.9-Build1.9.wsl",
        "0xf0fc07ed3543d3dc24cfb35b4194bbecf98485cefdd720c521034ac1c54bffd3",
    ),
    (
        "SUSE-Linux-Enterprise-15-SP7",
        "https://github.com/SUSE/WSL-instarball/releases/download/v20251201.0/SUSE-Linux-Enterprise-15-SP7-15.7.x86_64-30.1-Build30.1.wsl",
        "0x60924e13286ed15bdcf9069e3a24d3394fb858954de3bdfcb1ea576900b81b2e",
    ),
];
