use deepl_http::{DeepLClient, TextRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = DeepLClient::from_env()?;

    let translation = client
        .translate_text(
            &TextRequest::new("<p>Hello, <b>world</b>!</p>", "DE")
                .source_lang("EN")
                .extra("tag_handling", "xml"),
        )
        .await?;

    println!("{}", translation.text);
    if let Some(lang) = translation.detected_source_language {
        println!("detected source language: {lang}");
    }

    Ok(())
}
