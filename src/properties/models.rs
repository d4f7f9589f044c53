//! Property data models
//!
//! Defines the listing record and the typed mapping between public
//! dot-path parameter names and SQL columns.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Postal address of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
    /// State or province
    pub state: String,
    /// Town hall / municipality
    pub town_hall: String,
    /// Colony / neighborhood
    pub colony: String,
    /// Street name
    pub street: String,
    /// Outdoor number
    pub outdoor_number: String,
    /// Interior number
    pub interior_number: String,
}

/// Geographic coordinates of a listing
///
/// The public parameter name for longitude is `location.len`; existing
/// clients rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub len: f64,
}

/// A property listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Unique identifier, assigned on creation
    pub id: String,
    /// Owning party; set once at creation, never reassigned
    pub offerer: String,
    /// Postal address
    pub address: Address,
    /// Geographic coordinates
    pub location: Location,
    /// Media file references
    pub media_files: Vec<String>,
    /// Property type (house, apartment, ...)
    pub property_type: String,
    /// Asking price
    pub price: f64,
    /// Number of rooms
    pub rooms: i64,
    /// Number of bathrooms
    pub bathrooms: i64,
    /// Surface in square meters
    pub square_meters: f64,
    /// Price per square meter
    pub price_meters: f64,
    /// Furnished
    pub furnish: bool,
    /// Parking available
    pub parking: bool,
    /// Swimming pool
    pub swimming_pool: bool,
    /// Heating
    pub heating: bool,
    /// Security
    pub security: bool,
    /// Cellar
    pub cellar: bool,
    /// Elevator
    pub elevator: bool,
    /// Publicly discoverable once approved
    pub is_approve: bool,
    /// Soft-delete flag, never reverted
    pub is_disabled: bool,
    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl FromRow<'_, SqliteRow> for Property {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let media_raw: String = row.try_get("media_files")?;
        let media_files = serde_json::from_str(&media_raw).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "media_files".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            offerer: row.try_get("offerer")?,
            address: Address {
                postal_code: row.try_get("address_postal_code")?,
                country: row.try_get("address_country")?,
                state: row.try_get("address_state")?,
                town_hall: row.try_get("address_town_hall")?,
                colony: row.try_get("address_colony")?,
                street: row.try_get("address_street")?,
                outdoor_number: row.try_get("address_outdoor_number")?,
                interior_number: row.try_get("address_interior_number")?,
            },
            location: Location {
                lat: row.try_get("location_lat")?,
                len: row.try_get("location_len")?,
            },
            media_files,
            property_type: row.try_get("property_type")?,
            price: row.try_get("price")?,
            rooms: row.try_get("rooms")?,
            bathrooms: row.try_get("bathrooms")?,
            square_meters: row.try_get("square_meters")?,
            price_meters: row.try_get("price_meters")?,
            furnish: row.try_get("furnish")?,
            parking: row.try_get("parking")?,
            swimming_pool: row.try_get("swimming_pool")?,
            heating: row.try_get("heating")?,
            security: row.try_get("security")?,
            cellar: row.try_get("cellar")?,
            elevator: row.try_get("elevator")?,
            is_approve: row.try_get("is_approve")?,
            is_disabled: row.try_get("is_disabled")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Storage type of a listing field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// TEXT column
    Text,
    /// INTEGER column
    Integer,
    /// REAL column
    Real,
    /// Boolean stored as INTEGER 0/1
    Boolean,
    /// List of media references stored as a JSON TEXT column
    MediaList,
}

/// Allow-listed listing field
///
/// One variant per public parameter. Each variant knows its dot-path query
/// key, its SQL column, and the value kind it coerces to, so untyped input
/// never reaches the SQL layer as an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // Variants mirror the query keys below
pub enum PropertyField {
    AddressPostalCode,
    AddressCountry,
    AddressState,
    AddressTownHall,
    AddressColony,
    AddressStreet,
    AddressOutdoorNumber,
    AddressInteriorNumber,
    LocationLat,
    LocationLen,
    MediaFiles,
    PropertyType,
    Price,
    Rooms,
    Bathrooms,
    SquareMeters,
    PriceMeters,
    Furnish,
    Parking,
    SwimmingPool,
    Heating,
    Security,
    Cellar,
    Elevator,
}

impl PropertyField {
    /// Every allow-listed field, in the order used for creation
    pub const ALL: [PropertyField; 24] = [
        PropertyField::AddressPostalCode,
        PropertyField::AddressCountry,
        PropertyField::AddressState,
        PropertyField::AddressTownHall,
        PropertyField::AddressColony,
        PropertyField::AddressStreet,
        PropertyField::AddressOutdoorNumber,
        PropertyField::AddressInteriorNumber,
        PropertyField::LocationLat,
        PropertyField::LocationLen,
        PropertyField::MediaFiles,
        PropertyField::PropertyType,
        PropertyField::Price,
        PropertyField::Rooms,
        PropertyField::Bathrooms,
        PropertyField::SquareMeters,
        PropertyField::PriceMeters,
        PropertyField::Furnish,
        PropertyField::Parking,
        PropertyField::SwimmingPool,
        PropertyField::Heating,
        PropertyField::Security,
        PropertyField::Cellar,
        PropertyField::Elevator,
    ];

    /// Public dot-path parameter name
    pub fn query_key(self) -> &'static str {
        match self {
            PropertyField::AddressPostalCode => "address.postalCode",
            PropertyField::AddressCountry => "address.country",
            PropertyField::AddressState => "address.state",
            PropertyField::AddressTownHall => "address.townHall",
            PropertyField::AddressColony => "address.colony",
            PropertyField::AddressStreet => "address.street",
            PropertyField::AddressOutdoorNumber => "address.outdoorNumber",
            PropertyField::AddressInteriorNumber => "address.interiorNumber",
            PropertyField::LocationLat => "location.lat",
            PropertyField::LocationLen => "location.len",
            PropertyField::MediaFiles => "mediaFiles",
            PropertyField::PropertyType => "propertyType",
            PropertyField::Price => "price",
            PropertyField::Rooms => "rooms",
            PropertyField::Bathrooms => "bathrooms",
            PropertyField::SquareMeters => "squareMeters",
            PropertyField::PriceMeters => "priceMeters",
            PropertyField::Furnish => "furnish",
            PropertyField::Parking => "parking",
            PropertyField::SwimmingPool => "swimmingPool",
            PropertyField::Heating => "heating",
            PropertyField::Security => "security",
            PropertyField::Cellar => "cellar",
            PropertyField::Elevator => "elevator",
        }
    }

    /// SQL column backing the field
    pub fn column(self) -> &'static str {
        match self {
            PropertyField::AddressPostalCode => "address_postal_code",
            PropertyField::AddressCountry => "address_country",
            PropertyField::AddressState => "address_state",
            PropertyField::AddressTownHall => "address_town_hall",
            PropertyField::AddressColony => "address_colony",
            PropertyField::AddressStreet => "address_street",
            PropertyField::AddressOutdoorNumber => "address_outdoor_number",
            PropertyField::AddressInteriorNumber => "address_interior_number",
            PropertyField::LocationLat => "location_lat",
            PropertyField::LocationLen => "location_len",
            PropertyField::MediaFiles => "media_files",
            PropertyField::PropertyType => "property_type",
            PropertyField::Price => "price",
            PropertyField::Rooms => "rooms",
            PropertyField::Bathrooms => "bathrooms",
            PropertyField::SquareMeters => "square_meters",
            PropertyField::PriceMeters => "price_meters",
            PropertyField::Furnish => "furnish",
            PropertyField::Parking => "parking",
            PropertyField::SwimmingPool => "swimming_pool",
            PropertyField::Heating => "heating",
            PropertyField::Security => "security",
            PropertyField::Cellar => "cellar",
            PropertyField::Elevator => "elevator",
        }
    }

    /// Value kind the field coerces to at bind time
    pub fn kind(self) -> FieldKind {
        match self {
            PropertyField::AddressPostalCode
            | PropertyField::AddressCountry
            | PropertyField::AddressState
            | PropertyField::AddressTownHall
            | PropertyField::AddressColony
            | PropertyField::AddressStreet
            | PropertyField::AddressOutdoorNumber
            | PropertyField::AddressInteriorNumber
            | PropertyField::PropertyType => FieldKind::Text,
            PropertyField::LocationLat
            | PropertyField::LocationLen
            | PropertyField::Price
            | PropertyField::SquareMeters
            | PropertyField::PriceMeters => FieldKind::Real,
            PropertyField::Rooms | PropertyField::Bathrooms => FieldKind::Integer,
            PropertyField::MediaFiles => FieldKind::MediaList,
            PropertyField::Furnish
            | PropertyField::Parking
            | PropertyField::SwimmingPool
            | PropertyField::Heating
            | PropertyField::Security
            | PropertyField::Cellar
            | PropertyField::Elevator => FieldKind::Boolean,
        }
    }
}

/// A value coerced to its field's storage type, ready to bind
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// TEXT value
    Text(String),
    /// INTEGER value
    Int(i64),
    /// REAL value
    Real(f64),
    /// Boolean value
    Bool(bool),
}

impl BindValue {
    /// Coerce a raw JSON value to the storage type of `field`
    ///
    /// Query-string parameters arrive as strings, JSON bodies as native
    /// types; both are accepted. Values that fit neither produce an
    /// `InvalidParam` error.
    pub fn coerce(field: PropertyField, value: &Value) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidParam(field.query_key().to_string());

        match field.kind() {
            FieldKind::Text => match value {
                Value::String(s) => Ok(BindValue::Text(s.clone())),
                Value::Number(n) => Ok(BindValue::Text(n.to_string())),
                _ => Err(invalid()),
            },
            FieldKind::Integer => match value {
                Value::Number(n) => n.as_i64().map(BindValue::Int).ok_or_else(invalid),
                Value::String(s) => s.parse().map(BindValue::Int).map_err(|_| invalid()),
                _ => Err(invalid()),
            },
            FieldKind::Real => match value {
                Value::Number(n) => n.as_f64().map(BindValue::Real).ok_or_else(invalid),
                Value::String(s) => s.parse().map(BindValue::Real).map_err(|_| invalid()),
                _ => Err(invalid()),
            },
            FieldKind::Boolean => match value {
                Value::Bool(b) => Ok(BindValue::Bool(*b)),
                Value::String(s) => match s.as_str() {
                    "true" | "1" => Ok(BindValue::Bool(true)),
                    "false" | "0" => Ok(BindValue::Bool(false)),
                    _ => Err(invalid()),
                },
                Value::Number(n) => match n.as_i64() {
                    Some(0) => Ok(BindValue::Bool(false)),
                    Some(1) => Ok(BindValue::Bool(true)),
                    _ => Err(invalid()),
                },
                _ => Err(invalid()),
            },
            FieldKind::MediaList => match value {
                Value::Array(items) => {
                    let files: Vec<String> = items
                        .iter()
                        .map(|v| v.as_str().map(String::from).ok_or_else(invalid))
                        .collect::<Result<_, _>>()?;
                    Ok(BindValue::Text(
                        serde_json::to_string(&files).map_err(|_| invalid())?,
                    ))
                }
                // A single reference is accepted as a one-element list
                Value::String(s) => Ok(BindValue::Text(
                    serde_json::to_string(&[s]).map_err(|_| invalid())?,
                )),
                _ => Err(invalid()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_keys_are_unique() {
        let mut keys: Vec<&str> = PropertyField::ALL.iter().map(|f| f.query_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), PropertyField::ALL.len());
    }

    #[test]
    fn test_coerce_integer_from_string() {
        let v = BindValue::coerce(PropertyField::Rooms, &json!("3")).unwrap();
        assert_eq!(v, BindValue::Int(3));
    }

    #[test]
    fn test_coerce_boolean_variants() {
        for (raw, expected) in [
            (json!(true), true),
            (json!("true"), true),
            (json!("1"), true),
            (json!(false), false),
            (json!("false"), false),
            (json!(0), false),
        ] {
            let v = BindValue::coerce(PropertyField::Furnish, &raw).unwrap();
            assert_eq!(v, BindValue::Bool(expected));
        }
    }

    #[test]
    fn test_coerce_media_list() {
        let v = BindValue::coerce(PropertyField::MediaFiles, &json!(["a.jpg", "b.jpg"])).unwrap();
        assert_eq!(v, BindValue::Text(r#"["a.jpg","b.jpg"]"#.to_string()));

        let single = BindValue::coerce(PropertyField::MediaFiles, &json!("a.jpg")).unwrap();
        assert_eq!(single, BindValue::Text(r#"["a.jpg"]"#.to_string()));
    }

    #[test]
    fn test_coerce_rejects_mismatched_values() {
        assert!(BindValue::coerce(PropertyField::Rooms, &json!("many")).is_err());
        assert!(BindValue::coerce(PropertyField::Furnish, &json!("yes")).is_err());
        assert!(BindValue::coerce(PropertyField::Price, &json!([1, 2])).is_err());
    }

    #[test]
    fn test_property_serializes_with_camel_case_and_nesting() {
        let property = Property {
            id: "p1".to_string(),
            offerer: "o1".to_string(),
            address: Address {
                postal_code: "06100".to_string(),
                country: "MX".to_string(),
                state: "CDMX".to_string(),
                town_hall: "Cuauhtemoc".to_string(),
                colony: "Condesa".to_string(),
                street: "Amsterdam".to_string(),
                outdoor_number: "12".to_string(),
                interior_number: "3B".to_string(),
            },
            location: Location { lat: 19.41, len: -99.17 },
            media_files: vec!["a.jpg".to_string()],
            property_type: "apartment".to_string(),
            price: 100000.0,
            rooms: 3,
            bathrooms: 2,
            square_meters: 80.0,
            price_meters: 1250.0,
            furnish: true,
            parking: true,
            swimming_pool: false,
            heating: false,
            security: true,
            cellar: false,
            elevator: true,
            is_approve: false,
            is_disabled: false,
            created_at: 1_700_000_000,
        };

        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["address"]["postalCode"], "06100");
        assert_eq!(json["location"]["len"], -99.17);
        assert_eq!(json["isApprove"], false);
        assert_eq!(json["mediaFiles"][0], "a.jpg");
    }
}
