//! SeaORM entities for database tables

/// Properties table entity
pub mod immobilie {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "immobilien")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        /// Display title, required
        pub titel: String,

        pub beschreibung: Option<String>,

        /// Postal address as entered
        pub adresse: Option<String>,

        /// Creation timestamp
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::beziehung::Entity")]
        Beziehungen,
    }

    impl Related<super::beziehung::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Beziehungen.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Contacts table entity
pub mod kontakt {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "kontakte")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        /// Display name, required
        pub name: String,

        pub adresse: Option<String>,

        /// Creation timestamp
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::beziehung::Entity")]
        Beziehungen,
    }

    impl Related<super::beziehung::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Beziehungen.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Relationships table entity
pub mod beziehung {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "beziehungen")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        /// Foreign key to immobilien, cascades on delete
        pub immobilien_id: Uuid,

        /// Foreign key to kontakte, cascades on delete
        pub kontakt_id: Uuid,

        /// Relationship kind label (Eigentümer, Mieter, Dienstleister)
        pub art: String,

        pub startdatum: Option<Date>,

        pub enddatum: Option<Date>,

        /// Services provided, only for Dienstleister
        pub dienstleistungen: Option<String>,

        /// Creation timestamp
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::immobilie::Entity",
            from = "Column::ImmobilienId",
            to = "super::immobilie::Column::Id",
            on_delete = "Cascade"
        )]
        Immobilie,
        #[sea_orm(
            belongs_to = "super::kontakt::Entity",
            from = "Column::KontaktId",
            to = "super::kontakt::Column::Id",
            on_delete = "Cascade"
        )]
        Kontakt,
    }

    impl Related<super::immobilie::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Immobilie.def()
        }
    }

    impl Related<super::kontakt::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Kontakt.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
