/// How a member set is turned into its comparison key.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Canonicalization {
    /// Keep the sorted list of addresses.
    #[default]
    Sorted,
    /// Sort and concatenate the addresses without a separator.
    /// `["1", "23"]` and `["12", "3"]` compare equal under this strategy.
    Joined,
}

/// Order-insensitive key of a member set. Only used for equality.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum CanonicalForm {
    Sorted(Vec<String>),
    Joined(String),
}

impl Canonicalization {
    pub(crate) fn canonical_form(self, members: &[String]) -> CanonicalForm {
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        match self {
            Canonicalization::Sorted => CanonicalForm::Sorted(sorted),
            Canonicalization::Joined => CanonicalForm::Joined(sorted.concat()),
        }
    }
}
