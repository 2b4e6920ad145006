use quote::{format_ident, quote};
use syn::{parse_macro_input, LitStr};

/// Emits one `#[test]` per `.lox` file below the given directory (relative to `bin/tests`),
/// each calling `lox_expect` with the file's contents.
#[proc_macro]
pub fn generate_tests(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let dir = parse_macro_input!(input as LitStr).value();
    let root_dir = format!("{}/../{dir}", env!("CARGO_MANIFEST_DIR"));

    let tests: Vec<proc_macro2::TokenStream> = walkdir::WalkDir::new(&root_dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .map(|entry| {
            let test_file_path = entry.path().to_string_lossy().to_string();
            let relative_test_path = entry
                .path()
                .strip_prefix(&root_dir)
                .expect("walkdir only yields paths below its root")
                .with_extension("")
                .to_string_lossy()
                .replace(|c: char| !c.is_ascii_alphanumeric(), "_");
            let test_ident = format_ident!("test_{}", relative_test_path);
            quote! {
                #[test]
                fn #test_ident() {
                    lox_expect(std::fs::read_to_string(#test_file_path).unwrap().as_str());
                }
            }
        })
        .collect();

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#tests)*
    }
    .into()
}
