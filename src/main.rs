use dotenv::dotenv;
use serde_json::json;
use sheetchain::{column, GoogleSheetProvider, PasteType, PixelSize, Spreadsheet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let provider = GoogleSheetProvider::try_new_from_env().await?;
    let doc = Spreadsheet::open(provider).await?;

    println!("{} ({})", doc.title(), doc.url());
    for (title, sheet) in doc.sheets().iter() {
        println!(
            "  {title}: {} rows x {} columns (last column {})",
            sheet.row_count,
            sheet.column_count,
            column::encode(sheet.column_count.max(1))?,
        );
    }

    let sheet = "Blad1";
    doc.update_row(sheet, "A1:B1", vec![json!("Hello"), json!("World")])
        .await?;

    let mut chain = doc.actions();
    chain
        .copy_paste(sheet, "A1:B1", "A2", PasteType::Values)?
        .resize_column(sheet, "A:B", PixelSize::Auto)?
        .resize_row(sheet, "1:2", PixelSize::Fixed(32))?;
    let response = chain.flush().await?;
    println!("applied {} mutation(s)", response.replies.len());

    let values = doc.get(sheet, Some("A1:B2")).await?;
    println!("{values:?}");

    Ok(())
}
