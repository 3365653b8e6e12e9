use thiserror::Error;

/// Coarse classification of a [`BankError`], for callers (an HTTP layer,
/// typically) that map errors onto response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("account type must be `checking` or `savings`, got `{0}`")]
    InvalidAccountType(String),

    #[error("invalid node address `{0}`")]
    InvalidAddress(String),

    #[error("authorizer must not be empty")]
    EmptyAuthorizer,

    #[error("employee `{0}` not found")]
    UnknownEmployee(String),

    #[error("client `{0}` not found")]
    UnknownClient(String),

    #[error("account `{0}` not found")]
    UnknownAccount(String),

    // Resolver exhausted a chain without a match. Raised rather than
    // defaulted so a corrupted ledger never reads as legitimate absence.
    #[error("no meta record on the meta chain")]
    MissingMeta,

    #[error("no interbank record on the finance chain")]
    MissingInterbank,

    #[error("no repo portfolio record on the finance chain")]
    MissingRepoBook,

    #[error("authorizer `{0}` is not a registered node")]
    NotAuthorized(String),

    #[error("transfers are not allowed from savings accounts")]
    SavingsTransfer,
}

impl BankError {
    pub fn kind(&self) -> ErrorKind {
        use BankError::*;
        match self {
            InvalidAccountType(_) | InvalidAddress(_) | EmptyAuthorizer => ErrorKind::Validation,
            UnknownEmployee(_) | UnknownClient(_) | UnknownAccount(_) => ErrorKind::NotFound,
            MissingMeta | MissingInterbank | MissingRepoBook => ErrorKind::NotFound,
            NotAuthorized(_) => ErrorKind::Unauthorized,
            SavingsTransfer => ErrorKind::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_partition_the_taxonomy() {
        assert_eq!(
            BankError::InvalidAccountType("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            BankError::UnknownClient("c1".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(BankError::MissingMeta.kind(), ErrorKind::NotFound);
        assert_eq!(
            BankError::NotAuthorized("n1".into()).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(BankError::SavingsTransfer.kind(), ErrorKind::Forbidden);
    }
}
