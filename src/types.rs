use postgres::NoTls;
use r2d2;
use r2d2_postgres::PostgresConnectionManager;

pub type DbPool = r2d2::Pool<PostgresConnectionManager<NoTls>>;
pub type DbConnection = r2d2::PooledConnection<PostgresConnectionManager<NoTls>>;
