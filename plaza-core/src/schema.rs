//! Declarative entity schema descriptors.
//!
//! An entity declares a static list of attributes instead of relying on
//! runtime type inspection; the storage engine derives its table definition
//! and statements from that list. The attribute named `id` is always the
//! primary key, and tenant-scoped entities carry an [`TENANT_COLUMN`]
//! attribute.

/// Column name carried by every tenant-scoped entity.
pub const TENANT_COLUMN: &str = "organizationid";

/// Storage kind of a single entity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Variable-length text. Also the fallback for anything a descriptor
    /// cannot express more precisely.
    Text,
    Integer,
    /// Fixed-point decimal, stored with two fractional digits.
    Decimal,
    Boolean,
    /// Timestamp with time zone, defaulting to the row's insertion time.
    Timestamp,
    Uuid,
    /// Lists of primitives and nested objects, stored as one JSON document.
    Json,
}

impl AttributeKind {
    /// Column type per the fixed rule table.
    pub fn column_type(&self) -> &'static str {
        match self {
            AttributeKind::Text => "TEXT",
            AttributeKind::Integer => "BIGINT",
            AttributeKind::Decimal => "DECIMAL(18,2)",
            AttributeKind::Boolean => "BOOLEAN",
            AttributeKind::Timestamp => "TIMESTAMPTZ",
            AttributeKind::Uuid => "UUID",
            AttributeKind::Json => "JSONB",
        }
    }
}

/// One entity attribute: a lower-cased column name, its storage kind, and
/// whether the column is NOT NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub required: bool,
}

impl AttributeDescriptor {
    pub const fn new(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    pub const fn required(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// The attribute named `id` (case-insensitive) is always the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.name.eq_ignore_ascii_case("id")
    }

    /// Rendered column definition for a CREATE TABLE statement.
    pub fn column_def(&self) -> String {
        let mut def = format!("{} {}", self.name, self.kind.column_type());
        if matches!(self.kind, AttributeKind::Timestamp) {
            def.push_str(" DEFAULT now()");
        }
        if self.is_primary_key() {
            def.push_str(" PRIMARY KEY");
        } else if self.required {
            def.push_str(" NOT NULL");
        }
        def
    }
}

/// Static description of one entity type: its name, backing table (a
/// lower-cased override of the entity name) and attribute list.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    pub entity: &'static str,
    pub table: &'static str,
    pub attributes: &'static [AttributeDescriptor],
}

impl EntityDescriptor {
    pub const fn new(
        entity: &'static str,
        table: &'static str,
        attributes: &'static [AttributeDescriptor],
    ) -> Self {
        Self {
            entity,
            table,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn primary_key(&self) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.is_primary_key())
    }

    /// The tenant column, when this entity is tenant-scoped.
    pub fn tenant_attribute(&self) -> Option<&AttributeDescriptor> {
        self.attribute(TENANT_COLUMN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKING: EntityDescriptor = EntityDescriptor::new(
        "Booking",
        "booking",
        &[
            AttributeDescriptor::required("id", AttributeKind::Uuid),
            AttributeDescriptor::required("organizationid", AttributeKind::Text),
            AttributeDescriptor::new("guests", AttributeKind::Integer),
            AttributeDescriptor::new("price", AttributeKind::Decimal),
            AttributeDescriptor::new("confirmed", AttributeKind::Boolean),
            AttributeDescriptor::new("createdat", AttributeKind::Timestamp),
            AttributeDescriptor::new("extras", AttributeKind::Json),
        ],
    );

    #[test]
    fn rule_table_column_types() {
        assert_eq!(AttributeKind::Text.column_type(), "TEXT");
        assert_eq!(AttributeKind::Integer.column_type(), "BIGINT");
        assert_eq!(AttributeKind::Decimal.column_type(), "DECIMAL(18,2)");
        assert_eq!(AttributeKind::Boolean.column_type(), "BOOLEAN");
        assert_eq!(AttributeKind::Timestamp.column_type(), "TIMESTAMPTZ");
        assert_eq!(AttributeKind::Uuid.column_type(), "UUID");
        assert_eq!(AttributeKind::Json.column_type(), "JSONB");
    }

    #[test]
    fn id_is_always_the_primary_key() {
        let pk = BOOKING.primary_key().unwrap();
        assert_eq!(pk.name, "id");
        assert_eq!(pk.column_def(), "id UUID PRIMARY KEY");
    }

    #[test]
    fn required_attributes_render_not_null() {
        let tenant = BOOKING.tenant_attribute().unwrap();
        assert_eq!(tenant.column_def(), "organizationid TEXT NOT NULL");
    }

    #[test]
    fn timestamps_default_to_now() {
        let created = BOOKING.attribute("createdat").unwrap();
        assert_eq!(created.column_def(), "createdat TIMESTAMPTZ DEFAULT now()");
    }
}
