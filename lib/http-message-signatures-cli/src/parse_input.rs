use crate::util::success_kaomoji;
use http_message_signatures::signature_input;

pub fn do_it(header: String) -> miette::Result<()> {
    let input = match signature_input::parse(&header) {
        Ok(input) => input,
        Err(err) => return Err(miette::Error::new(err).with_source_code(header)),
    };

    println!("✅ Header is valid! {}", success_kaomoji());
    println!("label: {}", input.label);
    println!("created: {}", input.created);
    for component in &input.components {
        println!("component: {component}");
    }

    Ok(())
}
