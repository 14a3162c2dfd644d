use anyhow::Result;
use sales_etl::cleaning::CleanerRegistry;
use sales_etl::pipeline::Pipeline;
use sales_etl::sinks::CsvFileSink;
use sales_etl::sources::CsvFileSource;
use sales_etl::types::Dataset;
use std::fs;
use tempfile::tempdir;

async fn clean_csv(dataset: Dataset, raw: &str) -> Result<(String, usize)> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("raw.csv");
    let output = temp_dir.path().join("out").join("clean.csv");
    fs::write(&input, raw)?;

    let registry = CleanerRegistry::new();
    let result = Pipeline::run_for_dataset(
        dataset,
        &CsvFileSource::new(&input),
        &registry,
        &CsvFileSink::new(&output),
    )
    .await?;

    Ok((fs::read_to_string(&output)?, result.rows_dropped()))
}

#[tokio::test]
async fn test_products_export_is_cleaned() -> Result<()> {
    let raw = "\
,product_name,product_price,weight,category,EAN,date_added
0,FurReal Dazzlin' Dimples My Bouncin' Puppy,£39.99,1.6kg,toys-and-games,7425710935115,2005-12-02
1,Tiffany Table Lamp,£89.99,3 x 132g,homeware,8946580236421,2006 January 02
2,Bottled Water,£1.00,500ml,food-and-drink,1234567890123,2018/10/22
3,NULL,NULL,NULL,NULL,NULL,NULL
4,Mystery Box,£5.00,100g,toys-and-games,5555555555555,not a date
";

    let (cleaned, dropped) = clean_csv(Dataset::Products, raw).await?;

    assert_eq!(dropped, 2);
    let lines: Vec<&str> = cleaned.lines().collect();
    assert_eq!(
        lines,
        vec![
            "index,product_name,product_price,weight,category,EAN,date_added",
            "0,FurReal Dazzlin' Dimples My Bouncin' Puppy,£39.99,1.6kg,toys-and-games,7425710935115,2005-12-02",
            "1,Tiffany Table Lamp,£89.99,0.396kg,homeware,8946580236421,2006-01-02",
            "2,Bottled Water,£1.00,0.5kg,food-and-drink,1234567890123,2018-10-22",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_orders_export_loses_redundant_columns() -> Result<()> {
    let raw = "\
level_0,index,date_uuid,first_name,last_name,user_uuid,card_number,store_code,product_code,1,product_quantity
0,0,9476f17e,,,93caf182,4971858637664481,BL-8387506C,R7-3126933h,,3
1,1,0423a395,Ann,Lee,8fe96c3a,3554954842403828,WEB-1388012W,C2-7287916l,,2
";

    let (cleaned, dropped) = clean_csv(Dataset::Orders, raw).await?;

    assert_eq!(dropped, 0);
    let mut lines = cleaned.lines();
    assert_eq!(
        lines.next(),
        Some("level_0,index,date_uuid,user_uuid,card_number,store_code,product_code,product_quantity")
    );
    assert_eq!(
        lines.next(),
        Some("0,0,9476f17e,93caf182,4971858637664481,BL-8387506C,R7-3126933h,3")
    );
    assert_eq!(lines.count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_card_export_with_placeholder_rows() -> Result<()> {
    let raw = "\
card_number,expiry_date,card_provider,date_payment_confirmed
??4971858637664481,09/23,VISA 16 digit,2015-11-25
NULL,NULL,NULL,NULL
NB71VBAHJE,WJVMUO4QX6,JRPRLPIBZ2,TS8A81WFXV
3554954842403828,10/26,JCB 16 digit,December 2021 17
";

    let (cleaned, dropped) = clean_csv(Dataset::Cards, raw).await?;

    assert_eq!(dropped, 2);
    assert_eq!(
        cleaned,
        "card_number,expiry_date,card_provider,date_payment_confirmed\n\
         4971858637664481,09/23,VISA 16 digit,2015-11-25\n\
         3554954842403828,10/26,JCB 16 digit,2021-12-17\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_required_column_fails() {
    let result = clean_csv(Dataset::Stores, "index,address\n0,1 High St\n").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_orders_codes_and_card_numbers_are_untouched() -> Result<()> {
    let raw = "\
index,first_name,last_name,card_number,product_code,1,product_quantity
0,Ann,Lee,0004971858637664,0123,,3
1,Bo,Kim,9876543210987654321,0456,,1
";

    let (cleaned, _) = clean_csv(Dataset::Orders, raw).await?;

    assert_eq!(
        cleaned,
        "index,card_number,product_code,product_quantity\n\
         0,0004971858637664,0123,3\n\
         1,9876543210987654321,0456,1\n"
    );
    Ok(())
}
