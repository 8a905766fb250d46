//! Fixture file format and validation.

use byeolpedia_core::catalog::{validate_album_type, validate_group_type};
use byeolpedia_core::error::CoreError;
use chrono::NaiveDate;
use serde::Deserialize;

/// The catalog bundled with the binary, used when no path is given.
pub const DEFAULT_FIXTURE: &str = include_str!("../data/catalog.json");

/// Version name used for albums that list no versions.
pub const DEFAULT_VERSION: &str = "Standard";

#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    pub groups: Vec<GroupFixture>,
}

#[derive(Debug, Deserialize)]
pub struct GroupFixture {
    pub name: String,
    pub korean_name: String,
    pub debut_date: NaiveDate,
    pub agency: String,
    pub group_type: String,
    #[serde(default)]
    pub logo_image: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberFixture>,
    #[serde(default)]
    pub albums: Vec<AlbumFixture>,
    #[serde(default)]
    pub lightsticks: Vec<LightstickFixture>,
}

#[derive(Debug, Deserialize)]
pub struct MemberFixture {
    pub stage_name: String,
    pub real_name: String,
    pub birth_date: NaiveDate,
    pub position: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AlbumFixture {
    pub title: String,
    pub release_date: NaiveDate,
    pub album_type: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LightstickFixture {
    pub name: String,
    pub version: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub image: Option<String>,
}

impl CatalogFixture {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl GroupFixture {
    /// Check required fields and known type values for the group and
    /// everything nested under it.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("name", &self.name)?;
        require("korean_name", &self.korean_name)?;
        require("agency", &self.agency)?;
        validate_group_type(&self.group_type)?;

        for member in &self.members {
            require("stage_name", &member.stage_name)?;
            require("real_name", &member.real_name)?;
            require("position", &member.position)?;
        }

        for album in &self.albums {
            require("title", &album.title)?;
            validate_album_type(&album.album_type)?;
            for version in &album.versions {
                require("versions", version)?;
            }
        }
        if !self.albums.is_empty() && self.members.is_empty() {
            return Err(CoreError::Validation(format!(
                "{}: albums need at least one member to create photocards",
                self.name
            )));
        }

        for lightstick in &self.lightsticks {
            require("name", &lightstick.name)?;
            require("version", &lightstick.version)?;
        }
        Ok(())
    }
}

impl AlbumFixture {
    /// Version names to create; [`DEFAULT_VERSION`] when none are listed.
    pub fn version_names(&self) -> Vec<&str> {
        if self.versions.is_empty() {
            vec![DEFAULT_VERSION]
        } else {
            self.versions.iter().map(String::as_str).collect()
        }
    }
}

/// Name for the member card of `stage_name` in one album version.
pub fn photocard_name(stage_name: &str, album_title: &str, version: &str) -> String {
    if version == DEFAULT_VERSION {
        format!("{stage_name} - {album_title}")
    } else {
        format!("{stage_name} - {album_title} ({version})")
    }
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::invalid_field(field, "This field is required."))
    } else {
        Ok(())
    }
}
