use failure::Error as FailureError;

use types::DbPool;

pub fn run(db_pool: &DbPool) -> Result<(), FailureError> {
    let mut conn = db_pool.get()?;
    conn.batch_execute(
        "
        CREATE TABLE IF NOT EXISTS jerseys (
            id              UUID PRIMARY KEY,
            name            TEXT NOT NULL,
            team            TEXT NOT NULL,
            league          TEXT NOT NULL,
            season          TEXT NOT NULL DEFAULT '',
            price_naira     DOUBLE PRECISION NOT NULL,
            description     TEXT,
            image_url       TEXT,
            sizes           TEXT[] NOT NULL DEFAULT '{}',
            available_sizes TEXT[] NOT NULL DEFAULT '{}',
            stock_quantity  INTEGER NOT NULL DEFAULT 0,
            is_available    BOOLEAN NOT NULL DEFAULT TRUE,
            is_featured     BOOLEAN NOT NULL DEFAULT FALSE,
            created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE IF NOT EXISTS cart_items (
            id         UUID PRIMARY KEY,
            user_id    UUID NOT NULL,
            jersey_id  UUID NOT NULL REFERENCES jerseys (id),
            size       TEXT NOT NULL,
            quantity   INTEGER NOT NULL CHECK (quantity > 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

            CONSTRAINT cart_line UNIQUE (user_id, jersey_id, size)
        );

        CREATE TABLE IF NOT EXISTS orders (
            id               UUID PRIMARY KEY,
            order_number     TEXT NOT NULL,
            inquiry_number   TEXT,
            inquiry_type     TEXT,
            user_id          UUID,
            customer_name    TEXT NOT NULL DEFAULT '',
            customer_phone   TEXT NOT NULL DEFAULT '',
            customer_email   TEXT,
            delivery_address TEXT NOT NULL DEFAULT '',
            delivery_city    TEXT NOT NULL DEFAULT '',
            delivery_state   TEXT NOT NULL DEFAULT '',
            items            JSONB NOT NULL DEFAULT '[]',
            total_amount     DOUBLE PRECISION NOT NULL,
            status           TEXT NOT NULL DEFAULT 'pending',
            notes            TEXT,
            admin_notes      TEXT,
            quoted_price     DOUBLE PRECISION,
            priority_level   TEXT,
            response_time    TEXT,
            whatsapp_status  TEXT,
            whatsapp_sent_at TIMESTAMPTZ,
            created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at       TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE IF NOT EXISTS order_items (
            id         UUID PRIMARY KEY,
            order_id   UUID NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
            jersey_id  UUID REFERENCES jerseys (id) ON DELETE SET NULL,
            size       TEXT NOT NULL,
            quantity   INTEGER NOT NULL,
            price      DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE IF NOT EXISTS jersey_requests (
            id                 UUID PRIMARY KEY,
            user_id            UUID,
            full_name          TEXT NOT NULL,
            email              TEXT NOT NULL,
            phone_number       TEXT NOT NULL,
            jersey_name        TEXT NOT NULL,
            team               TEXT NOT NULL,
            league             TEXT,
            size               TEXT NOT NULL,
            additional_notes   TEXT,
            status             TEXT NOT NULL DEFAULT 'pending',
            admin_response     TEXT,
            whatsapp_contacted BOOLEAN NOT NULL DEFAULT FALSE,
            last_contacted_at  TIMESTAMPTZ,
            inquiry_id         UUID REFERENCES orders (id) ON DELETE SET NULL,
            created_at         TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at         TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id               UUID PRIMARY KEY,
            user_id          UUID NOT NULL UNIQUE,
            full_name        TEXT,
            phone_number     TEXT,
            delivery_address TEXT,
            city             TEXT,
            state            TEXT,
            avatar_url       TEXT,
            is_admin         BOOLEAN DEFAULT FALSE,
            created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at       TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE IF NOT EXISTS admin_settings (
            id                       UUID PRIMARY KEY,
            whatsapp_business_number TEXT NOT NULL,
            business_hours           JSONB NOT NULL,
            message_templates        JSONB NOT NULL DEFAULT '{}',
            auto_response_enabled    BOOLEAN DEFAULT TRUE,
            notification_email       TEXT,
            notification_preferences JSONB DEFAULT '{}',
            created_at               TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at               TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE IF NOT EXISTS wishlists (
            id         UUID PRIMARY KEY,
            user_id    UUID NOT NULL,
            jersey_id  UUID NOT NULL REFERENCES jerseys (id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

            CONSTRAINT wishlist_entry UNIQUE (user_id, jersey_id)
        );

        CREATE TABLE IF NOT EXISTS user_roles (
            id         UUID PRIMARY KEY,
            user_id    UUID NOT NULL,
            role       TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

            CONSTRAINT user_role UNIQUE (user_id, role)
        );
        ",
    )?;

    info!("Database schema is up to date");
    Ok(())
}
