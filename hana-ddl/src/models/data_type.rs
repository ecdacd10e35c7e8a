use std::fmt::{Display, Formatter};

use crate::quoting::qualified_name;

/// The built-in SAP HANA Cloud column types, plus user defined types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HanaDataType {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    SmallDecimal,
    Real,
    Double,
    Varchar,
    Nvarchar,
    Alphanum,
    ShortText,
    Varbinary,
    Blob,
    Clob,
    Nclob,
    Text,
    BinText,
    Date,
    Time,
    SecondDate,
    Timestamp,
    Boolean,
    StGeometry,
    StPoint,
    StCircularString,
    StLineString,
    StPolygon,
    StMultiPoint,
    StMultiLineString,
    StMultiPolygon,
    StGeometryCollection,
    RealVector,
    /// A type name this crate doesn't know, emitted as given.
    Other(String),
    /// A reference to a user defined type, qualified with its schema when rendered.
    UserDefined(String),
}

const KNOWN_TYPES: &[(&str, HanaDataType)] = &[
    ("TINYINT", HanaDataType::TinyInt),
    ("SMALLINT", HanaDataType::SmallInt),
    ("INT", HanaDataType::Integer),
    ("INTEGER", HanaDataType::Integer),
    ("BIGINT", HanaDataType::BigInt),
    ("DECIMAL", HanaDataType::Decimal),
    ("SMALLDECIMAL", HanaDataType::SmallDecimal),
    ("REAL", HanaDataType::Real),
    ("FLOAT", HanaDataType::Real),
    ("DOUBLE", HanaDataType::Double),
    ("VARCHAR", HanaDataType::Varchar),
    ("NVARCHAR", HanaDataType::Nvarchar),
    ("ALPHANUM", HanaDataType::Alphanum),
    ("SHORTTEXT", HanaDataType::ShortText),
    ("VARBINARY", HanaDataType::Varbinary),
    ("BLOB", HanaDataType::Blob),
    ("CLOB", HanaDataType::Clob),
    ("NCLOB", HanaDataType::Nclob),
    ("TEXT", HanaDataType::Text),
    ("BINTEXT", HanaDataType::BinText),
    ("DATE", HanaDataType::Date),
    ("TIME", HanaDataType::Time),
    ("SECONDDATE", HanaDataType::SecondDate),
    ("TIMESTAMP", HanaDataType::Timestamp),
    ("BOOLEAN", HanaDataType::Boolean),
    ("ST_GEOMETRY", HanaDataType::StGeometry),
    ("ST_POINT", HanaDataType::StPoint),
    ("ST_CIRCULARSTRING", HanaDataType::StCircularString),
    ("ST_LINESTRING", HanaDataType::StLineString),
    ("ST_POLYGON", HanaDataType::StPolygon),
    ("ST_MULTIPOINT", HanaDataType::StMultiPoint),
    ("ST_MULTILINESTRING", HanaDataType::StMultiLineString),
    ("ST_MULTIPOLYGON", HanaDataType::StMultiPolygon),
    ("ST_GEOMETRYCOLLECTION", HanaDataType::StGeometryCollection),
    ("REAL_VECTOR", HanaDataType::RealVector),
];

/// Logical model types that are not HANA type names themselves.
const LOGICAL_TYPES: &[(&str, HanaDataType)] = &[
    ("number", HanaDataType::Integer),
    ("string", HanaDataType::Nvarchar),
    ("char", HanaDataType::Nvarchar),
    ("binary", HanaDataType::Varbinary),
    ("document", HanaDataType::Nclob),
    ("json", HanaDataType::Nclob),
    ("array", HanaDataType::Nclob),
    ("geometry", HanaDataType::StGeometry),
    ("geospatial", HanaDataType::StGeometry),
    ("point", HanaDataType::StPoint),
    ("vector", HanaDataType::RealVector),
];

/// Whether `name` is a HANA type this crate knows, ignoring case.
pub fn has_type(name: &str) -> bool {
    KNOWN_TYPES.iter().any(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
}

/// Maps a logical model type to the HANA type used when no explicit mode is given.
/// Unknown types fall back to `NVARCHAR`.
pub fn default_type_for(logical_type: &str) -> HanaDataType {
    let logical_type = logical_type.trim();
    LOGICAL_TYPES
        .iter()
        .chain(KNOWN_TYPES)
        .find(|(name, _)| name.eq_ignore_ascii_case(logical_type))
        .map(|(_, t)| t.clone())
        .unwrap_or(HanaDataType::Nvarchar)
}

impl HanaDataType {
    /// Parses a HANA type name. Unknown names are kept as [`HanaDataType::Other`], upper cased.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        KNOWN_TYPES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, t)| t.clone())
            .unwrap_or_else(|| HanaDataType::Other(name.to_uppercase()))
    }

    pub fn name(&self) -> &str {
        match self {
            HanaDataType::TinyInt => "TINYINT",
            HanaDataType::SmallInt => "SMALLINT",
            HanaDataType::Integer => "INTEGER",
            HanaDataType::BigInt => "BIGINT",
            HanaDataType::Decimal => "DECIMAL",
            HanaDataType::SmallDecimal => "SMALLDECIMAL",
            HanaDataType::Real => "REAL",
            HanaDataType::Double => "DOUBLE",
            HanaDataType::Varchar => "VARCHAR",
            HanaDataType::Nvarchar => "NVARCHAR",
            HanaDataType::Alphanum => "ALPHANUM",
            HanaDataType::ShortText => "SHORTTEXT",
            HanaDataType::Varbinary => "VARBINARY",
            HanaDataType::Blob => "BLOB",
            HanaDataType::Clob => "CLOB",
            HanaDataType::Nclob => "NCLOB",
            HanaDataType::Text => "TEXT",
            HanaDataType::BinText => "BINTEXT",
            HanaDataType::Date => "DATE",
            HanaDataType::Time => "TIME",
            HanaDataType::SecondDate => "SECONDDATE",
            HanaDataType::Timestamp => "TIMESTAMP",
            HanaDataType::Boolean => "BOOLEAN",
            HanaDataType::StGeometry => "ST_GEOMETRY",
            HanaDataType::StPoint => "ST_POINT",
            HanaDataType::StCircularString => "ST_CIRCULARSTRING",
            HanaDataType::StLineString => "ST_LINESTRING",
            HanaDataType::StPolygon => "ST_POLYGON",
            HanaDataType::StMultiPoint => "ST_MULTIPOINT",
            HanaDataType::StMultiLineString => "ST_MULTILINESTRING",
            HanaDataType::StMultiPolygon => "ST_MULTIPOLYGON",
            HanaDataType::StGeometryCollection => "ST_GEOMETRYCOLLECTION",
            HanaDataType::RealVector => "REAL_VECTOR",
            HanaDataType::Other(name) | HanaDataType::UserDefined(name) => name.as_str(),
        }
    }

    pub fn supports_length(&self) -> bool {
        matches!(
            self,
            HanaDataType::Varchar
                | HanaDataType::Nvarchar
                | HanaDataType::Alphanum
                | HanaDataType::ShortText
                | HanaDataType::Varbinary
                | HanaDataType::RealVector
        )
    }

    /// DECIMAL and SMALLDECIMAL take both a precision and a scale.
    pub fn supports_precision_and_scale(&self) -> bool {
        matches!(self, HanaDataType::Decimal | HanaDataType::SmallDecimal)
    }

    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            HanaDataType::StGeometry
                | HanaDataType::StPoint
                | HanaDataType::StCircularString
                | HanaDataType::StLineString
                | HanaDataType::StPolygon
                | HanaDataType::StMultiPoint
                | HanaDataType::StMultiLineString
                | HanaDataType::StMultiPolygon
                | HanaDataType::StGeometryCollection
        )
    }

    pub fn supports_identity(&self) -> bool {
        matches!(
            self,
            HanaDataType::TinyInt | HanaDataType::SmallInt | HanaDataType::Integer | HanaDataType::BigInt
        )
    }

    /// Types whose default values are string literals.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            HanaDataType::Varchar
                | HanaDataType::Nvarchar
                | HanaDataType::Alphanum
                | HanaDataType::ShortText
                | HanaDataType::Clob
                | HanaDataType::Nclob
                | HanaDataType::Text
        )
    }
}

/// A column type together with the modifiers that decide its suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub data_type: HanaDataType,
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub dimension: Option<i64>,
    pub srid: Option<i64>,
    /// Owning schema of a user defined type.
    pub udt_schema: Option<String>,
}

impl ColumnType {
    pub fn new(data_type: HanaDataType) -> Self {
        Self {
            data_type,
            length: None,
            precision: None,
            scale: None,
            dimension: None,
            srid: None,
            udt_schema: None,
        }
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: Option<i64>, scale: Option<i64>) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Picks the one suffix family that applies to this type. The first matching rule wins.
    pub fn resolve(&self) -> TypeClause {
        let data_type = &self.data_type;
        let name = data_type.name().to_string();

        if data_type.supports_length() {
            if let Some(length) = self.length {
                return TypeClause::Length { name, length };
            }
        }

        if data_type.supports_precision_and_scale() {
            if let Some(scale) = self.scale {
                return TypeClause::PrecisionScale {
                    name,
                    precision: self.precision.filter(|p| *p != 0),
                    scale,
                };
            }
            if let Some(precision) = self.precision {
                return TypeClause::Precision { name, precision };
            }
        }

        if *data_type == HanaDataType::RealVector {
            return TypeClause::Vector {
                dimension: self.dimension.filter(|d| *d > 0),
            };
        }

        if data_type.is_spatial() {
            return TypeClause::Spatial {
                name,
                srid: self.srid.filter(|s| *s > 0),
            };
        }

        if let HanaDataType::UserDefined(type_name) = data_type {
            if let Some(schema) = self.udt_schema.as_deref().filter(|s| !s.trim().is_empty()) {
                return TypeClause::UserDefined {
                    schema: schema.to_string(),
                    name: type_name.clone(),
                };
            }
        }

        TypeClause::Bare(name)
    }
}

/// The rendered form of a column type. Exactly one suffix family applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClause {
    Length { name: String, length: i64 },
    /// A missing or zero precision renders as `*`.
    PrecisionScale { name: String, precision: Option<i64>, scale: i64 },
    Precision { name: String, precision: i64 },
    Vector { dimension: Option<i64> },
    Spatial { name: String, srid: Option<i64> },
    UserDefined { schema: String, name: String },
    Bare(String),
}

impl Display for TypeClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeClause::Length { name, length } => write!(f, "{name}({length})"),
            TypeClause::PrecisionScale {
                name,
                precision: Some(precision),
                scale,
            } => write!(f, "{name}({precision},{scale})"),
            TypeClause::PrecisionScale {
                name,
                precision: None,
                scale,
            } => write!(f, "{name}(*,{scale})"),
            TypeClause::Precision { name, precision } => write!(f, "{name}({precision})"),
            TypeClause::Vector { dimension: Some(d) } => write!(f, "REAL_VECTOR({d})"),
            TypeClause::Vector { dimension: None } => write!(f, "REAL_VECTOR"),
            TypeClause::Spatial { name, srid: Some(srid) } => write!(f, "{name}({srid})"),
            TypeClause::Spatial { name, srid: None } => write!(f, "{name}"),
            TypeClause::UserDefined { schema, name } => write!(f, "{}", qualified_name(Some(schema), name)),
            TypeClause::Bare(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(column_type: ColumnType) -> String {
        column_type.resolve().to_string()
    }

    #[test]
    fn decimal_precision_and_scale() {
        let decimal = ColumnType::new(HanaDataType::Decimal);
        assert_eq!(render(decimal.clone().with_precision(Some(10), Some(2))), "DECIMAL(10,2)");
        assert_eq!(render(decimal.clone().with_precision(Some(10), None)), "DECIMAL(10)");
        assert_eq!(render(decimal.clone()), "DECIMAL");
        assert_eq!(render(decimal.clone().with_precision(None, Some(2))), "DECIMAL(*,2)");
        assert_eq!(render(decimal.with_precision(Some(5), Some(0))), "DECIMAL(5,0)");
    }

    #[test]
    fn zero_precision_with_a_scale_is_a_wildcard() {
        let decimal = ColumnType::new(HanaDataType::Decimal);
        assert_eq!(render(decimal.clone().with_precision(Some(0), Some(2))), "DECIMAL(*,2)");
        assert_eq!(render(decimal.with_precision(Some(0), None)), "DECIMAL(0)");
    }

    #[test]
    fn length_takes_priority() {
        assert_eq!(render(ColumnType::new(HanaDataType::Nvarchar).with_length(50)), "NVARCHAR(50)");
        assert_eq!(render(ColumnType::new(HanaDataType::Nvarchar)), "NVARCHAR");
        assert_eq!(render(ColumnType::new(HanaDataType::Varbinary).with_length(0)), "VARBINARY(0)");

        // Length only applies to types that take one.
        assert_eq!(render(ColumnType::new(HanaDataType::Integer).with_length(10)), "INTEGER");

        let mut vector = ColumnType::new(HanaDataType::RealVector).with_length(3);
        vector.dimension = Some(768);
        assert_eq!(render(vector), "REAL_VECTOR(3)");
    }

    #[test]
    fn vector_and_spatial() {
        let mut vector = ColumnType::new(HanaDataType::RealVector);
        assert_eq!(render(vector.clone()), "REAL_VECTOR");
        vector.dimension = Some(0);
        assert_eq!(render(vector.clone()), "REAL_VECTOR");
        vector.dimension = Some(768);
        assert_eq!(render(vector), "REAL_VECTOR(768)");

        let mut point = ColumnType::new(HanaDataType::StPoint);
        assert_eq!(render(point.clone()), "ST_POINT");
        point.srid = Some(4326);
        assert_eq!(render(point), "ST_POINT(4326)");
    }

    #[test]
    fn user_defined_types() {
        let mut udt = ColumnType::new(HanaDataType::UserDefined("Address".to_string()));
        assert_eq!(render(udt.clone()), "Address");
        udt.udt_schema = Some("S".to_string());
        assert_eq!(render(udt), "\"S\".\"Address\"");
    }

    #[test]
    fn exactly_one_clause_family() {
        let mut column_type = ColumnType::new(HanaDataType::Decimal).with_length(5).with_precision(Some(10), Some(2));
        column_type.dimension = Some(3);
        column_type.srid = Some(4326);
        column_type.udt_schema = Some("S".to_string());
        assert_eq!(render(column_type), "DECIMAL(10,2)");
    }

    #[test]
    fn names_and_defaults() {
        assert_eq!(HanaDataType::from_name("int"), HanaDataType::Integer);
        assert_eq!(HanaDataType::from_name("Float"), HanaDataType::Real);
        assert_eq!(HanaDataType::from_name("geography"), HanaDataType::Other("GEOGRAPHY".to_string()));
        assert!(has_type("st_point"));
        assert!(!has_type("string"));
        assert_eq!(default_type_for("string"), HanaDataType::Nvarchar);
        assert_eq!(default_type_for("number"), HanaDataType::Integer);
        assert_eq!(default_type_for("json"), HanaDataType::Nclob);
        assert_eq!(default_type_for("vector"), HanaDataType::RealVector);
        assert_eq!(default_type_for("bigint"), HanaDataType::BigInt);
        assert_eq!(default_type_for("unheard-of"), HanaDataType::Nvarchar);
    }
}
