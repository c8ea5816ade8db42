use std::path::Path;

use crate::{
    catalog::{Catalog, Table},
    connection::SqlConnection,
    datasets::{read_iris_records, Dataset},
    error::LoaderError,
    loader::{DataLoader, SimpleCsvLoader},
    log_info,
    tuple::Field,
    verify::{spot_check, verify_table, Verification},
};

/// Row and column of the iris table compared against the raw CSV.
const SPOT_CHECK_ROW: usize = 1;
const SPOT_CHECK_COL: usize = 0;

/// Drop every table of `catalog` (children first), then create them all
/// (parents first).
pub fn recreate_schema<C: SqlConnection>(conn: &mut C, catalog: &Catalog) -> Result<(), LoaderError> {
    for table in catalog.drop_order() {
        conn.execute_ddl(&table.drop_sql())?;
    }
    for table in catalog.tables() {
        conn.execute_ddl(&table.create_sql())?;
        log_info!("Created table {}", table.name());
    }
    Ok(())
}

/// Cursor flavour: recreate, load and verify every table of every dataset.
pub fn run_cursor<C: SqlConnection>(
    conn: &mut C,
    datasets: &[Dataset],
    data_dir: &Path,
) -> Result<Vec<Verification>, LoaderError> {
    let mut verifications = Vec::new();
    for dataset in datasets {
        verifications.extend(load_dataset(conn, *dataset, data_dir)?);
    }
    Ok(verifications)
}

pub fn load_dataset<C: SqlConnection>(
    conn: &mut C,
    dataset: Dataset,
    data_dir: &Path,
) -> Result<Vec<Verification>, LoaderError> {
    let catalog = dataset.catalog()?;
    recreate_schema(conn, &catalog)?;

    let mut verifications = Vec::new();
    for table in catalog.tables() {
        let path = dataset.csv_path(data_dir, table.name())?;
        let mut loader = SimpleCsvLoader::from_path(&path)?;
        let written = loader.load_data(conn, table)?;
        let verification = verify_table(conn, table, &written)?;
        verification.ensure_exact()?;
        verifications.push(verification);
    }

    if dataset == Dataset::Iris {
        if let Some(table) = catalog.get_table("iris") {
            let path = dataset.csv_path(data_dir, table.name())?;
            spot_check_iris(conn, &table, &path)?;
        }
    }
    Ok(verifications)
}

/// Compare one fetched measurement with the value read straight from the
/// CSV file.
pub fn spot_check_iris<C: SqlConnection>(
    conn: &mut C,
    table: &Table,
    csv_path: &Path,
) -> Result<(), LoaderError> {
    let records = read_iris_records(csv_path)?;
    let Some(record) = records.get(SPOT_CHECK_ROW) else {
        return Ok(());
    };
    let fetched = conn.query(&table.select_all_sql(), &table.schema())?;
    let schema = table.schema();
    let col_def = schema.get_column(SPOT_CHECK_COL);
    let expected = Field::from_str(col_def, &record.sepal_length.to_string())?;

    if let Some(row) = fetched.get(SPOT_CHECK_ROW) {
        println!("{}", row.to_pretty_string());
        println!("{}: {}", col_def.name(), row.get(SPOT_CHECK_COL));
    }
    println!("Sepal.Length: {}", record.sepal_length);

    if !spot_check(&fetched, SPOT_CHECK_ROW, SPOT_CHECK_COL, &expected) {
        return Err(LoaderError::Verification(format!(
            "{} row {}: {} does not match source value {}",
            table.name(),
            SPOT_CHECK_ROW,
            col_def.name(),
            record.sepal_length
        )));
    }
    Ok(())
}

/// Frame flavour: like [`run_cursor`], but every CSV goes through a polars
/// `DataFrame` and each table is also read back into one and compared with
/// the source frame by column position, both sorted by the primary key.
#[cfg(feature = "dataframe")]
pub fn run_frame<C: SqlConnection>(
    conn: &mut C,
    datasets: &[Dataset],
    data_dir: &Path,
) -> Result<Vec<Verification>, LoaderError> {
    use crate::{
        loader::DataFrameLoader,
        verify::frame::{ensure_column_matches, read_table_frame, sort_by_key},
    };

    let mut verifications = Vec::new();
    for dataset in datasets {
        let catalog = dataset.catalog()?;
        recreate_schema(conn, &catalog)?;
        for table in catalog.tables() {
            let path = dataset.csv_path(data_dir, table.name())?;
            let mut loader = DataFrameLoader::from_path(&path)?;
            let written = loader.load_data(conn, table)?;

            // Integer keys are rowids in SQLite, so rows come back in key order.
            let key = table.schema().primary_key_indices().clone();
            let source = sort_by_key(loader.dataframe(), &key)?;
            let fetched = sort_by_key(&read_table_frame(conn, table)?, &key)?;
            ensure_column_matches(table.name(), &source, &fetched, 0)?;

            let verification = verify_table(conn, table, &written)?;
            verification.ensure_exact()?;
            verifications.push(verification);
        }
    }
    Ok(verifications)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        connection::{with_connection, SqliteConnection},
        tuple::Tuple,
    };

    const IRIS: &str = "Sepal.Length,Sepal.Width,Petal.Length,Petal.Width,Species
5.1,3.5,1.4,0.2,setosa
4.9,3,1.4,0.2,setosa
7,3.2,4.7,1.4,versicolor
6.3,3.3,6,2.5,virginica
";
    const CUSTOMERS: &str = "CId,LastName,FirstName
1,LOGAN,JULIET
2,ARZT,TERRELL
3,ESPOSITA,TRAVIS
";
    const GOODS: &str = "GId,Flavor,Food,Price
20-BC-C-10,Chocolate,Cake,8.95
70-TU,Tuile,Cookie,1.25
90-APR-PF,Apricot,Tart,3.25
";
    const RECEIPTS: &str = "RNumber,SaleDate,Customer
18129,28-Oct-2007,1
21162,3-Oct-2007,2
51991,17-Oct-2007,1
";
    const ITEMS: &str = "Receipt,Ordinal,Item
18129,1,70-TU
21162,1,90-APR-PF
21162,2,20-BC-C-10
51991,1,70-TU
";

    fn write_data(dir: &Path, iris: &str, items: &str) {
        fs::create_dir_all(dir.join("bakery")).unwrap();
        fs::write(dir.join("iris.csv"), iris).unwrap();
        fs::write(dir.join("bakery/customers.csv"), CUSTOMERS).unwrap();
        fs::write(dir.join("bakery/goods.csv"), GOODS).unwrap();
        fs::write(dir.join("bakery/receipts.csv"), RECEIPTS).unwrap();
        fs::write(dir.join("bakery/items.csv"), items).unwrap();
    }

    #[fixture]
    fn data_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_data(dir.path(), IRIS, ITEMS);
        dir
    }

    fn select_all(conn: &mut SqliteConnection, dataset: Dataset, table: &str) -> Vec<Tuple> {
        let catalog = dataset.catalog().unwrap();
        let table = catalog.get_table(table).unwrap();
        conn.query(&table.select_all_sql(), &table.schema()).unwrap()
    }

    #[rstest]
    fn test_iris_round_trip(data_dir: TempDir) {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let verifications = run_cursor(&mut conn, &[Dataset::Iris], data_dir.path()).unwrap();
        assert_eq!(verifications.len(), 1);
        assert_eq!(verifications[0].fetched, 4);

        let rows = select_all(&mut conn, Dataset::Iris, "iris");
        let records = read_iris_records(data_dir.path().join("iris.csv")).unwrap();
        for record in &records {
            let expected = Tuple::from_fields(vec![
                record.sepal_length.into(),
                record.sepal_width.into(),
                record.petal_length.into(),
                record.petal_width.into(),
                record.species.as_str().into(),
            ]);
            assert!(rows.contains(&expected), "{} not loaded", expected);
        }
        assert_eq!(
            rows[0],
            Tuple::from_fields(vec![5.1.into(), 3.5.into(), 1.4.into(), 0.2.into(), "setosa".into()])
        );
    }

    #[rstest]
    fn test_bakery_load(data_dir: TempDir) {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let verifications = run_cursor(&mut conn, &[Dataset::Bakery], data_dir.path()).unwrap();
        let counts = verifications
            .iter()
            .map(|v| (v.table.as_str(), v.fetched))
            .collect::<Vec<_>>();
        assert_eq!(
            counts,
            vec![("customers", 3), ("goods", 3), ("receipts", 3), ("items", 4)]
        );

        let receipts = select_all(&mut conn, Dataset::Bakery, "receipts");
        let dates = receipts
            .iter()
            .map(|r| r.get(1).clone())
            .collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec!["20071028".into(), "20071003".into(), "20071017".into()]
        );
    }

    #[rstest]
    fn test_reload_is_idempotent(data_dir: TempDir) {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let all = [Dataset::Iris, Dataset::Bakery];
        run_cursor(&mut conn, &all, data_dir.path()).unwrap();
        let verifications = run_cursor(&mut conn, &all, data_dir.path()).unwrap();
        assert!(verifications.iter().all(|v| v.is_exact()));
        assert_eq!(select_all(&mut conn, Dataset::Iris, "iris").len(), 4);
        assert_eq!(select_all(&mut conn, Dataset::Bakery, "items").len(), 4);
    }

    #[rstest]
    #[case::unknown_good("Receipt,Ordinal,Item\n18129,1,70-TU\n18129,2,NO-SUCH\n")]
    #[case::unknown_receipt("Receipt,Ordinal,Item\n99999,1,70-TU\n")]
    fn test_items_require_existing_parents(#[case] items: &str) {
        let dir = tempfile::tempdir().unwrap();
        write_data(dir.path(), IRIS, items);
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let err = run_cursor(&mut conn, &[Dataset::Bakery], dir.path()).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        ));
    }

    #[test]
    fn test_receipts_require_existing_customer() {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let catalog = Dataset::Bakery.catalog().unwrap();
        recreate_schema(&mut conn, &catalog).unwrap();
        let receipts = catalog.get_table("receipts").unwrap();
        let err = conn
            .execute(
                &receipts.insert_sql(),
                &[18129.into(), "20071028".into(), 42.into()],
            )
            .unwrap_err();
        assert!(matches!(err, LoaderError::Database(_)));
    }

    #[rstest]
    fn test_malformed_date_aborts(data_dir: TempDir) {
        fs::write(
            data_dir.path().join("bakery/receipts.csv"),
            "RNumber,SaleDate,Customer\n18129,2007-10-28,1\n",
        )
        .unwrap();
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let err = run_cursor(&mut conn, &[Dataset::Bakery], data_dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidDate(_)));
    }

    #[rstest]
    fn test_missing_csv_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let err = run_cursor(&mut conn, &[Dataset::Iris], dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Csv(_)));
    }

    #[rstest]
    fn test_run_on_database_file(data_dir: TempDir) {
        let db_path = data_dir.path().join("loader.db");
        let config = crate::config::ConnectionConfig::new(db_path.to_str().unwrap(), "alice", "secret");
        let conn = SqliteConnection::open(&config, true).unwrap();
        with_connection(conn, |conn| run_cursor(conn, &[Dataset::Iris], data_dir.path())).unwrap();

        // The data survives the connection being closed.
        let mut conn = SqliteConnection::open(&config, false).unwrap();
        assert_eq!(select_all(&mut conn, Dataset::Iris, "iris").len(), 4);
    }

    #[test]
    fn test_shipped_data() {
        let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let verifications =
            run_cursor(&mut conn, &[Dataset::Iris, Dataset::Bakery], &data_dir).unwrap();
        assert_eq!(verifications[0].table, "iris");
        assert_eq!(verifications[0].fetched, 150);
        assert!(verifications.iter().all(|v| v.is_exact()));
    }

    #[cfg(feature = "dataframe")]
    #[rstest]
    fn test_frame_round_trip(data_dir: TempDir) {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let all = [Dataset::Iris, Dataset::Bakery];
        let verifications = run_frame(&mut conn, &all, data_dir.path()).unwrap();
        assert_eq!(verifications.len(), 5);
        assert!(verifications.iter().all(|v| v.is_exact()));

        // Same tables as the cursor flavour produces.
        let mut cursor_conn = SqliteConnection::open_in_memory().unwrap();
        run_cursor(&mut cursor_conn, &all, data_dir.path()).unwrap();
        for (dataset, table) in [
            (Dataset::Iris, "iris"),
            (Dataset::Bakery, "receipts"),
            (Dataset::Bakery, "goods"),
        ] {
            assert_eq!(
                select_all(&mut conn, dataset, table),
                select_all(&mut cursor_conn, dataset, table)
            );
        }
    }

    #[rstest]
    fn test_negative_zero_decimal_round_trips(data_dir: TempDir) {
        fs::write(
            data_dir.path().join("iris.csv"),
            "Sepal.Length,Sepal.Width,Petal.Length,Petal.Width,Species\n\
             5.1,3.5,1.4,-0.0,setosa\n\
             4.9,3,1.4,-0.001,setosa\n",
        )
        .unwrap();
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let verifications = run_cursor(&mut conn, &[Dataset::Iris], data_dir.path()).unwrap();
        assert!(verifications[0].is_exact());
    }

    #[cfg(feature = "dataframe")]
    #[rstest]
    fn test_frame_accepts_unsorted_keys(data_dir: TempDir) {
        fs::write(
            data_dir.path().join("bakery/receipts.csv"),
            "RNumber,SaleDate,Customer\n\
             51991,17-Oct-2007,1\n\
             18129,28-Oct-2007,1\n\
             21162,3-Oct-2007,2\n",
        )
        .unwrap();
        fs::write(
            data_dir.path().join("bakery/customers.csv"),
            "CId,LastName,FirstName\n3,ESPOSITA,TRAVIS\n1,LOGAN,JULIET\n2,ARZT,TERRELL\n",
        )
        .unwrap();
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let verifications = run_frame(&mut conn, &[Dataset::Bakery], data_dir.path()).unwrap();
        assert!(verifications.iter().all(|v| v.is_exact()));
    }

    #[cfg(feature = "dataframe")]
    #[rstest]
    #[case::bad_decimal("iris.csv", "Sepal.Length,Sepal.Width,Petal.Length,Petal.Width,Species\n5.1,3.5,1.4,0.2,setosa\n4.9,abc,1.4,0.2,setosa\n")]
    #[case::fractional_int("bakery/receipts.csv", "RNumber,SaleDate,Customer\n18129,28-Oct-2007,1\n51991,17-Oct-2007,1.7\n")]
    fn test_frame_rejects_malformed_cell(
        data_dir: TempDir,
        #[case] file: &str,
        #[case] contents: &str,
    ) {
        fs::write(data_dir.path().join(file), contents).unwrap();
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let all = [Dataset::Iris, Dataset::Bakery];
        let err = run_frame(&mut conn, &all, data_dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidField(_)), "{}", err);

        // The cursor flavour rejects the same file.
        let err = run_cursor(&mut conn, &all, data_dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidField(_)), "{}", err);
    }
}
