//! Minimal ERC-20 surface the sandbox needs.

use alloy_sol_types::sol;

sol! {
    function balanceOf(address owner) external view returns (uint256);
    function transfer(address to, uint256 amount) external returns (bool);
    function approve(address spender, uint256 amount) external returns (bool);
}
