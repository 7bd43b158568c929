pub mod pyrotechnics;
