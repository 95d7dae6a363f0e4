/// Crawl phase definitions for the orchestrator
use std::fmt;

/// The phases of one crawl run
///
/// ```text
/// Init -> Provisioning -> Paginating -> PerRecipe* -> PageDone -+-> Paginating
///                      \                                        \-> Retrying -> Terminal
///                       \-> Retrying (nothing left to crawl)
/// ```
///
/// Every non-terminal phase may also jump to `Terminal` on a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing has happened yet
    Init,

    /// Creating the diet tables
    Provisioning,

    /// Loading a listing page and collecting its recipe links
    Paginating,

    /// Handling one recipe URL
    PerRecipe,

    /// Every link on the page has been attempted
    PageDone,

    /// Single retry pass over this run's failures
    Retrying,

    /// Resources released; the run is over
    Terminal,
}

impl CrawlPhase {
    /// Returns true once the run is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        if next == Terminal {
            return *self != Terminal;
        }

        matches!(
            (self, next),
            (Init, Provisioning)
                | (Provisioning, Paginating)
                | (Provisioning, Retrying)
                | (Paginating, PerRecipe)
                | (Paginating, PageDone)
                | (PerRecipe, PerRecipe)
                | (PerRecipe, PageDone)
                | (PageDone, Paginating)
                | (PageDone, Retrying)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Provisioning => "provisioning",
            Self::Paginating => "paginating",
            Self::PerRecipe => "per_recipe",
            Self::PageDone => "page_done",
            Self::Retrying => "retrying",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            CrawlPhase::Init,
            CrawlPhase::Provisioning,
            CrawlPhase::Paginating,
            CrawlPhase::PerRecipe,
            CrawlPhase::PerRecipe,
            CrawlPhase::PageDone,
            CrawlPhase::Paginating,
            CrawlPhase::PageDone,
            CrawlPhase::Retrying,
            CrawlPhase::Terminal,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_fatal_error_reaches_terminal_from_anywhere() {
        for phase in [
            CrawlPhase::Init,
            CrawlPhase::Provisioning,
            CrawlPhase::Paginating,
            CrawlPhase::PerRecipe,
            CrawlPhase::PageDone,
            CrawlPhase::Retrying,
        ] {
            assert!(phase.can_transition_to(CrawlPhase::Terminal));
        }
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!CrawlPhase::Init.can_transition_to(CrawlPhase::Paginating));
        assert!(!CrawlPhase::Provisioning.can_transition_to(CrawlPhase::PerRecipe));
        assert!(!CrawlPhase::PerRecipe.can_transition_to(CrawlPhase::Paginating));
        assert!(!CrawlPhase::Retrying.can_transition_to(CrawlPhase::Paginating));
        assert!(!CrawlPhase::Terminal.can_transition_to(CrawlPhase::Terminal));
        assert!(!CrawlPhase::Terminal.can_transition_to(CrawlPhase::Init));
    }

    #[test]
    fn test_is_terminal() {
        assert!(CrawlPhase::Terminal.is_terminal());
        assert!(!CrawlPhase::Retrying.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::PerRecipe.to_string(), "per_recipe");
        assert_eq!(format!("{}", CrawlPhase::PageDone), "page_done");
    }
}
