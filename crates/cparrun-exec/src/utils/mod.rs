mod kill;
pub(crate) use kill::terminate;
