//! Resource map data model.
//!
//! A [`Tag`] is a node in one of three independent forests, partitioned by
//! [`TagType`]. Location tags may carry [`LocationMetadata`].

use serde::{Deserialize, Serialize};

use crate::defaults::{GEOFENCE_MIN_POLYGON_POINTS, PATH_SEPARATOR};
use crate::error::{Error, Result};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque tag identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TagId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Workspace identifier; every tag list is scoped to one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkspaceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// TAG TYPE
// =============================================================================

/// The forest a tag belongs to. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagType {
    Location,
    BusinessUnit,
    Role,
}

impl TagType {
    pub const ALL: [TagType; 3] = [TagType::Location, TagType::BusinessUnit, TagType::Role];

    /// Wire name used by the GraphQL API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "LOCATION",
            Self::BusinessUnit => "BUSINESS_UNIT",
            Self::Role => "ROLE",
        }
    }

    pub fn supports_location(&self) -> bool {
        matches!(self, Self::Location)
    }
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TagType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "LOCATION" => Ok(Self::Location),
            "BUSINESS_UNIT" | "BUSINESSUNIT" => Ok(Self::BusinessUnit),
            "ROLE" => Ok(Self::Role),
            _ => Err(format!("Invalid tag type: {}", s)),
        }
    }
}

// =============================================================================
// LOCATION METADATA
// =============================================================================

/// Postal address of a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// A circular or polygonal boundary attached to a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Geofence {
    #[serde(rename_all = "camelCase")]
    Circle {
        center: Coordinate,
        radius_meters: f64,
    },
    Polygon { points: Vec<Coordinate> },
}

impl Geofence {
    /// Whether the geofence may be persisted. Polygons with fewer than
    /// three points are an in-progress edit.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Circle { radius_meters, .. } => *radius_meters > 0.0,
            Self::Polygon { points } => points.len() >= GEOFENCE_MIN_POLYGON_POINTS,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Circle {
                center,
                radius_meters,
            } => {
                center.validate()?;
                if !(*radius_meters > 0.0) {
                    return Err(Error::InvalidInput(format!(
                        "geofence radius must be positive, got {}",
                        radius_meters
                    )));
                }
            }
            Self::Polygon { points } => {
                if points.len() < GEOFENCE_MIN_POLYGON_POINTS {
                    return Err(Error::InvalidInput(format!(
                        "polygon geofence needs at least {} points, got {}",
                        GEOFENCE_MIN_POLYGON_POINTS,
                        points.len()
                    )));
                }
                for point in points {
                    point.validate()?;
                }
            }
        }
        Ok(())
    }
}

/// Positional metadata of a LOCATION tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationMetadata {
    Address(Address),
    LatLng {
        lat: f64,
        lng: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accuracy: Option<f64>,
    },
    PlusCode {
        code: String,
    },
    Geofence {
        geofence: Geofence,
    },
}

impl LocationMetadata {
    /// Wire discriminator of this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "ADDRESS",
            Self::LatLng { .. } => "LAT_LNG",
            Self::PlusCode { .. } => "PLUS_CODE",
            Self::Geofence { .. } => "GEOFENCE",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Address(address) => {
                if address.line1.trim().is_empty() || address.city.trim().is_empty() {
                    return Err(Error::InvalidInput(
                        "address requires line1 and city".to_string(),
                    ));
                }
            }
            Self::LatLng { lat, lng, accuracy } => {
                Coordinate::new(*lat, *lng).validate()?;
                if let Some(accuracy) = accuracy {
                    if !(*accuracy >= 0.0) {
                        return Err(Error::InvalidInput(format!(
                            "accuracy must be a non-negative number, got {}",
                            accuracy
                        )));
                    }
                }
            }
            Self::PlusCode { code } => {
                if code.trim().is_empty() {
                    return Err(Error::InvalidInput("plus code is empty".to_string()));
                }
            }
            Self::Geofence { geofence } => geofence.validate()?,
        }
        Ok(())
    }
}

// =============================================================================
// TAG
// =============================================================================

/// A node in one of the resource map forests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub value: String,
    pub tag_type: TagType,
    /// Parent tag (None = root)
    #[serde(default)]
    pub parent_id: Option<TagId>,
    /// Ancestor values from the forest root to this tag, derived by the store
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(
        default,
        rename = "location",
        alias = "locationMetadata",
        skip_serializing_if = "Option::is_none"
    )]
    pub location_metadata: Option<LocationMetadata>,
}

impl Tag {
    /// Create a root-level tag whose path holds only its own value.
    pub fn new(id: impl Into<TagId>, value: impl Into<String>, tag_type: TagType) -> Self {
        let value = value.into();
        Self {
            id: id.into(),
            path: vec![value.clone()],
            value,
            tag_type,
            parent_id: None,
            location_metadata: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<TagId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    pub fn with_location(mut self, location: LocationMetadata) -> Self {
        self.location_metadata = Some(location);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Path rendered for display, e.g. `"Site / Building / Floor"`.
    pub fn display_path(&self) -> String {
        if self.path.is_empty() {
            return self.value.clone();
        }
        self.path.join(PATH_SEPARATOR)
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

fn validate_value(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput("tag value must not be empty".to_string()));
    }
    Ok(())
}

fn validate_location(tag_type: TagType, location: Option<&LocationMetadata>) -> Result<()> {
    match location {
        Some(_) if !tag_type.supports_location() => Err(Error::InvalidInput(format!(
            "location metadata is only allowed on LOCATION tags, not {}",
            tag_type
        ))),
        Some(location) => location.validate(),
        None => Ok(()),
    }
}

/// Request for creating a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub workspace_id: WorkspaceId,
    pub value: String,
    pub tag_type: TagType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationMetadata>,
}

impl CreateTagRequest {
    pub fn validate(&self) -> Result<()> {
        validate_value(&self.value)?;
        validate_location(self.tag_type, self.location.as_ref())
    }
}

/// Partial update of a tag. `tag_type` is deliberately absent.
///
/// `parent_id` and `location` are tri-state: `None` leaves the field alone,
/// `Some(None)` clears it, `Some(Some(_))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<TagId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<LocationMetadata>>,
}

impl UpdateTagRequest {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn parent(parent_id: Option<TagId>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Default::default()
        }
    }

    pub fn location(location: Option<LocationMetadata>) -> Self {
        Self {
            location: Some(location),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.parent_id.is_none() && self.location.is_none()
    }

    /// Validate against the type of the tag being updated.
    pub fn validate(&self, tag_type: TagType) -> Result<()> {
        if let Some(value) = &self.value {
            validate_value(value)?;
        }
        if let Some(location) = &self.location {
            validate_location(tag_type, location.as_ref())?;
        }
        Ok(())
    }
}

/// Response of a delete: the id that was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTagResponse {
    pub id: TagId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_type_parsing() {
        assert_eq!("location".parse::<TagType>().unwrap(), TagType::Location);
        assert_eq!(
            "business-unit".parse::<TagType>().unwrap(),
            TagType::BusinessUnit
        );
        assert_eq!("ROLE".parse::<TagType>().unwrap(), TagType::Role);
        assert!("department".parse::<TagType>().is_err());
    }

    #[test]
    fn test_tag_type_serialization() {
        assert_eq!(
            serde_json::to_value(TagType::BusinessUnit).unwrap(),
            json!("BUSINESS_UNIT")
        );
    }

    #[test]
    fn test_tag_deserialize_from_wire() {
        let tag: Tag = serde_json::from_value(json!({
            "id": "t-2",
            "value": "Warehouse",
            "tagType": "LOCATION",
            "parentId": "t-1",
            "path": ["Austin", "Warehouse"],
            "location": {"kind": "LAT_LNG", "lat": 30.27, "lng": -97.74}
        }))
        .unwrap();

        assert_eq!(tag.id, TagId::from("t-2"));
        assert_eq!(tag.parent_id, Some(TagId::from("t-1")));
        assert_eq!(tag.display_path(), "Austin / Warehouse");
        assert_eq!(
            tag.location_metadata,
            Some(LocationMetadata::LatLng {
                lat: 30.27,
                lng: -97.74,
                accuracy: None
            })
        );
    }

    #[test]
    fn test_tag_accepts_location_metadata_alias_and_null_parent() {
        let tag: Tag = serde_json::from_value(json!({
            "id": "t-1",
            "value": "Austin",
            "tagType": "LOCATION",
            "parentId": null,
            "locationMetadata": {"kind": "PLUS_CODE", "code": "6294+XQ"}
        }))
        .unwrap();
        assert!(tag.is_root());
        assert!(tag.path.is_empty());
        assert_eq!(tag.display_path(), "Austin");
        assert_eq!(tag.location_metadata.unwrap().kind(), "PLUS_CODE");
    }

    #[test]
    fn test_geofence_wire_format() {
        let meta = LocationMetadata::Geofence {
            geofence: Geofence::Circle {
                center: Coordinate::new(1.0, 2.0),
                radius_meters: 50.0,
            },
        };
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!({
                "kind": "GEOFENCE",
                "geofence": {"type": "CIRCLE", "center": {"lat": 1.0, "lng": 2.0}, "radiusMeters": 50.0}
            })
        );
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let mut points = vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
        let draft = Geofence::Polygon {
            points: points.clone(),
        };
        assert!(!draft.is_complete());
        assert!(draft.validate().is_err());

        points.push(Coordinate::new(1.0, 1.0));
        let fence = Geofence::Polygon { points };
        assert!(fence.is_complete());
        assert!(fence.validate().is_ok());
    }

    #[test]
    fn test_empty_polygon_is_not_persistable() {
        let fence = Geofence::Polygon { points: vec![] };
        assert!(!fence.is_complete());
        assert!(fence.validate().is_err());
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(91.0, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -181.0).validate().is_err());
        assert!(Coordinate::new(-90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn test_lat_lng_accuracy_must_be_a_non_negative_number() {
        let at = |accuracy| LocationMetadata::LatLng {
            lat: 30.0,
            lng: -97.0,
            accuracy: Some(accuracy),
        };
        assert!(at(0.0).validate().is_ok());
        assert!(at(12.5).validate().is_ok());
        assert!(at(-1.0).validate().is_err());
        assert!(at(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_circle_radius_must_be_positive() {
        let fence = Geofence::Circle {
            center: Coordinate::new(0.0, 0.0),
            radius_meters: 0.0,
        };
        assert!(!fence.is_complete());
        assert!(fence.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_empty_value() {
        let req = CreateTagRequest {
            workspace_id: "ws".into(),
            value: "   ".to_string(),
            tag_type: TagType::Role,
            parent_id: None,
            location: None,
        };
        assert!(matches!(req.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_create_request_rejects_location_on_non_location_tag() {
        let req = CreateTagRequest {
            workspace_id: "ws".into(),
            value: "Finance".to_string(),
            tag_type: TagType::BusinessUnit,
            parent_id: None,
            location: Some(LocationMetadata::PlusCode {
                code: "6294+XQ".to_string(),
            }),
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("only allowed on LOCATION"));
    }

    #[test]
    fn test_update_request_tri_state_serialization() {
        let clear = UpdateTagRequest::parent(None);
        assert_eq!(
            serde_json::to_value(&clear).unwrap(),
            json!({"parentId": null})
        );

        let set = UpdateTagRequest::parent(Some("p".into()));
        assert_eq!(serde_json::to_value(&set).unwrap(), json!({"parentId": "p"}));

        let untouched = UpdateTagRequest::value("New name");
        assert_eq!(
            serde_json::to_value(&untouched).unwrap(),
            json!({"value": "New name"})
        );
    }

    #[test]
    fn test_update_request_validation() {
        assert!(UpdateTagRequest::default().is_empty());
        assert!(UpdateTagRequest::value("").validate(TagType::Role).is_err());
        assert!(UpdateTagRequest::location(None)
            .validate(TagType::Role)
            .is_ok());
        assert!(UpdateTagRequest::location(Some(LocationMetadata::PlusCode {
            code: "X".into()
        }))
        .validate(TagType::Role)
        .is_err());
    }
}
