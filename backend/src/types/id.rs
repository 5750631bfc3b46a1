//! Typed ID wrappers for compile-time type safety.
//!
//! Each wrapper holds a UUID and maps onto a native `UUID` column, so a
//! `ClassId` can never be bound where a `SubjectId` is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{encode::IsNull, error::BoxDynError, Database, Decode, Encode, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! typed_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.0.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Uuid::parse_str(&s)
                    .map(Self)
                    .map_err(serde::de::Error::custom)
            }
        }

        impl<'r, DB: Database> Decode<'r, DB> for $name
        where
            Uuid: Decode<'r, DB>,
        {
            fn decode(value: <DB as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
                <Uuid as Decode<'r, DB>>::decode(value).map(Self)
            }
        }

        impl<'q, DB: Database> Encode<'q, DB> for $name
        where
            Uuid: Encode<'q, DB>,
        {
            fn encode_by_ref(
                &self,
                buf: &mut <DB as Database>::ArgumentBuffer<'q>,
            ) -> Result<IsNull, BoxDynError> {
                <Uuid as Encode<'q, DB>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<DB: Database> Type<DB> for $name
        where
            Uuid: Type<DB>,
        {
            fn type_info() -> <DB as Database>::TypeInfo {
                <Uuid as Type<DB>>::type_info()
            }

            fn compatible(ty: &<DB as Database>::TypeInfo) -> bool {
                <Uuid as Type<DB>>::compatible(ty)
            }
        }

        impl utoipa::PartialSchema for $name {
            fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
                utoipa::openapi::ObjectBuilder::new()
                    .schema_type(utoipa::openapi::schema::Type::String)
                    .format(Some(utoipa::openapi::SchemaFormat::KnownFormat(
                        utoipa::openapi::KnownFormat::Uuid,
                    )))
                    .into()
            }
        }

        impl utoipa::ToSchema for $name {}
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(SessionId, "Unique identifier for an authentication session.");
typed_id!(RefreshTokenId, "Unique identifier for a stored refresh token.");
typed_id!(StudentProfileId, "Unique identifier for a student profile.");
typed_id!(TeacherProfileId, "Unique identifier for a teacher profile.");
typed_id!(ClassId, "Unique identifier for a class.");
typed_id!(SubjectId, "Unique identifier for a subject.");
typed_id!(ClassSubjectId, "Unique identifier for a class-subject link.");
typed_id!(EnrollmentId, "Unique identifier for an enrollment.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_strings_and_serde() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().expect("parse id");
        assert_eq!(parsed, id);

        let json = serde_json::to_value(id).expect("serialize id");
        assert_eq!(json, serde_json::Value::String(id.to_string()));
        let back: UserId = serde_json::from_value(json).expect("deserialize id");
        assert_eq!(back, id);
    }

    #[test]
    fn ids_document_as_uuid_strings() {
        let schema = serde_json::to_value(<EnrollmentId as utoipa::PartialSchema>::schema())
            .expect("serialize schema");
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["format"], "uuid");
    }

    #[test]
    fn ids_reject_malformed_input() {
        assert!("not-a-uuid".parse::<ClassId>().is_err());
        assert!(serde_json::from_str::<SubjectId>("\"42\"").is_err());
    }
}
