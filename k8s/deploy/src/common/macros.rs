/// Converts a list of values which implement ToString into a Vec<String>.
#[macro_export]
macro_rules! vec_to_strings {
    ($($x:expr),*) => (vec![$($x.to_string()),*]);
}
